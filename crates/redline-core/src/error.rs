//! Error types for annotation placement

use thiserror::Error;

/// Errors that can occur while placing an annotation in a paragraph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    /// The range is empty, reversed, or runs past the paragraph's text
    #[error("Invalid range {start}-{end} for text length {len}")]
    InvalidRange {
        /// Requested start offset
        start: usize,
        /// Requested end offset
        end: usize,
        /// Original-text length of the paragraph
        len: usize,
    },

    /// The range touches text already covered by another annotation
    #[error("Range {start}-{end} overlaps an existing annotation")]
    Overlap {
        /// Requested start offset
        start: usize,
        /// Requested end offset
        end: usize,
    },
}

/// Result type for annotation operations
pub type Result<T> = std::result::Result<T, AnnotateError>;
