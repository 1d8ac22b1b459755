//! redline-core - Review annotation engine
//!
//! Turns a review payload into a [`redline_ast::Document`]:
//! - [`html`] splits HTML content into headings, paragraphs and list items
//! - [`locate`] maps character offsets onto runs and splits them
//! - [`annotate`] renders an annotation as tracked changes or a comment
//! - [`assemble`] lays out field entries and places their annotations

pub mod annotate;
pub mod assemble;
pub mod error;
pub mod html;
pub mod locate;
pub mod text;

pub use annotate::{
    annotate, renderer_for, AnnotationMode, AnnotationRenderer, CommentRenderer,
    TrackChangeRenderer,
};
pub use assemble::{assemble, default_timestamp, AssembleOptions, AssembleReport, Assembler};
pub use error::{AnnotateError, Result};
pub use html::parse_blocks;
pub use locate::{locate, split, Located, SplitPoint};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
