//! Configuration settings
//!
//! Settings are loaded from `redline.toml`:
//!
//! ```toml
//! [review]
//! author = "Legal Team"
//! initials = "LT"
//! date = "2024-01-01T00:00:00Z"
//! mode = "comments"
//! highlight = "yellow"
//!
//! [layout]
//! field_headings = true
//! heading_level = 2
//! section_spacing = true
//! title = "Contract Review"
//!
//! [annotations]
//! relocate_by_text = true
//! ```

use serde::{Deserialize, Serialize};

use redline_ast::{Attribution, HighlightColor};
use redline_core::{default_timestamp, AnnotationMode, AssembleOptions};

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Who the review is attributed to, and how it is rendered
    pub review: ReviewSettings,
    /// Document layout
    pub layout: LayoutSettings,
    /// Annotation placement
    pub annotations: AnnotationSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Assembler options described by these settings
    ///
    /// Without a configured date, revisions are stamped with the current
    /// time.
    pub fn assemble_options(&self) -> AssembleOptions {
        let date = self.review.date.clone().unwrap_or_else(default_timestamp);
        AssembleOptions {
            mode: self.review.mode,
            attribution: Attribution::new(
                self.review.author.clone(),
                self.review.initials.clone(),
                date,
            ),
            field_headings: self.layout.field_headings,
            heading_level: self.layout.heading_level.clamp(1, 9),
            section_spacing: self.layout.section_spacing,
            relocate_by_text: self.annotations.relocate_by_text,
            highlight: self.review.highlight,
        }
    }
}

/// Review attribution and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Revision and comment author
    pub author: String,
    /// Comment initials
    pub initials: String,
    /// Fixed ISO-8601 timestamp; the current time when unset
    pub date: Option<String>,
    /// Track changes or comments
    pub mode: AnnotationMode,
    /// Highlight colour for commented text, one of Word's names
    pub highlight: Option<HighlightColor>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            author: "Reviewer".to_string(),
            initials: "R".to_string(),
            date: None,
            mode: AnnotationMode::TrackChanges,
            highlight: None,
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Emit a heading for each field name
    pub field_headings: bool,
    /// Level of field headings (1-9)
    pub heading_level: u8,
    /// Empty paragraph after each field
    pub section_spacing: bool,
    /// Core document title
    pub title: Option<String>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            field_headings: true,
            heading_level: 1,
            section_spacing: true,
            title: None,
        }
    }
}

/// Annotation placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnnotationSettings {
    /// Search for `commented_text` when offsets do not fit
    pub relocate_by_text: bool,
}
