//! Block-level elements for document structure
//!
//! Every block is a single Word paragraph; the kind decides its style and
//! numbering.

use serde::{Deserialize, Serialize};

use crate::inline::{self, Inline, Run};

/// What a block renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// A section heading (level 1-9, where 1 is the highest)
    Heading(u8),
    /// A body paragraph
    Paragraph,
    /// A list item
    ListItem {
        /// Numbered (`ol`) rather than bulleted (`ul`)
        ordered: bool,
        /// Nesting level (0-based)
        level: u8,
    },
}

/// A paragraph-like block and its inline content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block kind
    pub kind: BlockKind,
    /// Inline content
    pub content: Vec<Inline>,
}

impl Block {
    /// Create a block with the given content
    pub fn new(kind: BlockKind, content: Vec<Inline>) -> Self {
        Self { kind, content }
    }

    /// Create a heading holding a single plain run
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading(level), vec![Inline::text(text)])
    }

    /// Create a paragraph holding a single plain run
    ///
    /// An empty string yields an empty paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        let text = text.into();
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Inline::text(text)]
        };
        Self::new(BlockKind::Paragraph, content)
    }

    /// Create a paragraph from runs
    pub fn from_runs(kind: BlockKind, runs: Vec<Run>) -> Self {
        Self::new(kind, runs.into_iter().map(Inline::Run).collect())
    }

    /// Original-text length of the block
    pub fn original_len(&self) -> usize {
        inline::original_len(&self.content)
    }

    /// Original text of the block
    pub fn original_text(&self) -> String {
        inline::original_text(&self.content)
    }

    /// Whether the block has no content
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
