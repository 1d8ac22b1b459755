//! redline-ast - Input and document model definitions
//!
//! This crate provides the types shared by the redline crates:
//! - [`input`]: the JSON review payload (field entries and their annotations)
//! - [`block`] and [`inline`]: the assembled document, made of paragraphs whose
//!   content is a sequence of runs, revisions and comment markers
//! - [`document`]: the document root and the comments it carries

pub mod block;
pub mod document;
pub mod inline;
pub mod input;

pub use block::{Block, BlockKind};
pub use document::{Attribution, Comment, Document};
pub use inline::{original_len, original_text, HighlightColor, Inline, Revision, Run, RunStyle};
pub use input::{Annotation, ContentType, FieldEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
