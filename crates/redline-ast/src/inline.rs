//! Inline elements for paragraph content
//!
//! A paragraph's content is a flat sequence of [`Inline`] children: plain
//! runs, revision wrappers around runs, and zero-width comment markers.

use serde::{Deserialize, Serialize};

/// Character formatting of a run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStyle {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Monospace/code text
    pub monospace: bool,
    /// Highlight colour
    pub highlight: Option<HighlightColor>,
}

/// Word highlight colours (`ST_HighlightColor`)
///
/// Word only accepts these names in `w:highlight`; serde uses the same
/// spelling, e.g. `"yellow"` or `"darkBlue"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightColor {
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    Yellow,
    White,
    DarkBlue,
    DarkCyan,
    DarkGreen,
    DarkMagenta,
    DarkRed,
    DarkYellow,
    DarkGray,
    LightGray,
}

impl HighlightColor {
    /// The `w:val` name
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightColor::Black => "black",
            HighlightColor::Blue => "blue",
            HighlightColor::Cyan => "cyan",
            HighlightColor::Green => "green",
            HighlightColor::Magenta => "magenta",
            HighlightColor::Red => "red",
            HighlightColor::Yellow => "yellow",
            HighlightColor::White => "white",
            HighlightColor::DarkBlue => "darkBlue",
            HighlightColor::DarkCyan => "darkCyan",
            HighlightColor::DarkGreen => "darkGreen",
            HighlightColor::DarkMagenta => "darkMagenta",
            HighlightColor::DarkRed => "darkRed",
            HighlightColor::DarkYellow => "darkYellow",
            HighlightColor::DarkGray => "darkGray",
            HighlightColor::LightGray => "lightGray",
        }
    }
}

impl std::fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RunStyle {
    /// Whether the style carries no formatting at all
    pub fn is_plain(&self) -> bool {
        *self == RunStyle::default()
    }
}

/// A contiguous span of text sharing uniform formatting
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,
    /// Character formatting
    pub style: RunStyle,
}

impl Run {
    /// Create an unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    /// Create a run with the given style
    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Attribution of a tracked change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Revision ID (`w:id`), unique within the document
    pub id: u32,
    /// Author name
    pub author: String,
    /// ISO-8601 timestamp
    pub date: String,
}

/// Inline-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    /// Plain text run
    Run(Run),
    /// Runs removed by a tracked change
    Deletion {
        /// Change attribution
        revision: Revision,
        /// Deleted runs (original text)
        runs: Vec<Run>,
    },
    /// Runs added by a tracked change
    Insertion {
        /// Change attribution
        revision: Revision,
        /// Inserted runs
        runs: Vec<Run>,
    },
    /// Start of a commented range
    CommentRangeStart(u32),
    /// End of a commented range
    CommentRangeEnd(u32),
    /// Anchor of the margin comment
    CommentReference(u32),
}

impl Inline {
    /// Create a plain text run
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Run(Run::new(text))
    }

    /// Characters of original text this element contributes
    ///
    /// Deleted runs still count: they are part of the text the reviewer saw.
    /// Inserted runs and markers do not.
    pub fn original_len(&self) -> usize {
        match self {
            Inline::Run(run) => run.char_len(),
            Inline::Deletion { runs, .. } => runs.iter().map(Run::char_len).sum(),
            Inline::Insertion { .. }
            | Inline::CommentRangeStart(_)
            | Inline::CommentRangeEnd(_)
            | Inline::CommentReference(_) => 0,
        }
    }

    /// Append this element's original text to `out`
    fn push_original(&self, out: &mut String) {
        match self {
            Inline::Run(run) => out.push_str(&run.text),
            Inline::Deletion { runs, .. } => {
                for run in runs {
                    out.push_str(&run.text);
                }
            }
            _ => {}
        }
    }
}

/// Total original-text length of a paragraph's content
pub fn original_len(content: &[Inline]) -> usize {
    content.iter().map(Inline::original_len).sum()
}

/// Original text of a paragraph's content
pub fn original_text(content: &[Inline]) -> String {
    let mut out = String::new();
    for inline in content {
        inline.push_original(&mut out);
    }
    out
}
