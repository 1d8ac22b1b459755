//! Document root and review metadata
//!
//! The assembled document is a list of blocks plus the margin comments
//! referenced from them.

use serde::{Deserialize, Serialize};

use crate::block::Block;

/// Author, initials and timestamp stamped on every revision and comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    /// Author name
    pub author: String,
    /// Author initials (comments only)
    pub initials: String,
    /// ISO-8601 timestamp, e.g. `2024-01-01T00:00:00Z`
    pub date: String,
}

impl Attribution {
    /// Create an attribution
    pub fn new(
        author: impl Into<String>,
        initials: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            initials: initials.into(),
            date: date.into(),
        }
    }
}

/// A margin comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment ID, matching the range markers in the body
    pub id: u32,
    /// Author name
    pub author: String,
    /// Author initials
    pub initials: String,
    /// ISO-8601 timestamp
    pub date: String,
    /// Comment body
    pub text: String,
}

/// A complete assembled document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document content blocks
    pub blocks: Vec<Block>,
    /// Margin comments, in ID order
    pub comments: Vec<Comment>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether any block is a list item
    pub fn has_lists(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b.kind, crate::block::BlockKind::ListItem { .. }))
    }
}
