//! # redline-ooxml
//!
//! OOXML (Office Open XML) package generation for redline.
//!
//! This crate provides functionality to:
//! - Read DOCX/DOTX templates and the styles they define
//! - Write an assembled review document as `word/document.xml`, with
//!   tracked insertions and deletions or margin comments
//! - Keep relationships, content types and core properties consistent
//!
//! ## Example: Writing into a Template
//!
//! ```no_run
//! use redline_ast::{Block, Document};
//! use redline_ooxml::{DocxWriter, Template};
//!
//! let mut doc = Document::new();
//! doc.push(Block::paragraph("Reviewed text"));
//!
//! let template = Template::load("corporate.dotx")?;
//! let mut writer = DocxWriter::new();
//! writer.set_title("Review");
//! let bytes = writer.generate_with_template(&doc, template)?;
//! std::fs::write("review.docx", bytes)?;
//! # Ok::<(), redline_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod builtin;
pub mod content_types;
pub mod error;
pub mod relationships;
pub mod styles;
pub mod template;
pub mod writer;
pub mod xml;

#[cfg(test)]
mod test_utils;

pub use archive::OoxmlArchive;
pub use content_types::ContentTypes;
pub use error::{OoxmlError, Result};
pub use relationships::{Relationship, Relationships};
pub use styles::{ElementType, Style, StyleMap, StyleSheet, StyleType};
pub use template::Template;
pub use writer::DocxWriter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
