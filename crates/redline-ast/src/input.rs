//! Review payload definitions
//!
//! The input is a JSON array of field entries. Each entry carries a field
//! name, its content (HTML or plain text) and the annotations a reviewer
//! attached to character ranges of that content.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One field of the review payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldEntry {
    /// Field name, rendered as a section heading when non-empty
    #[serde(deserialize_with = "null_as_default")]
    pub field_name: String,
    /// HTML fragment or plain text
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    /// How `content` should be interpreted
    #[serde(deserialize_with = "null_as_default")]
    pub content_type: ContentType,
    /// Annotations keyed by character offsets into the content's paragraphs
    #[serde(deserialize_with = "null_as_default")]
    pub comments: Vec<Annotation>,
}

/// Content interpretation
///
/// Anything other than `html` (case-insensitive) is treated as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// Simple HTML, split into headings, paragraphs and list items
    Html,
    /// Plain text, rendered as a single paragraph
    #[default]
    Text,
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("html") {
            ContentType::Html
        } else {
            ContentType::Text
        }
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Html => "html".to_string(),
            ContentType::Text => "text".to_string(),
        }
    }
}

/// A reviewer annotation over a half-open character range
///
/// Offsets count Unicode scalar values of the paragraph text the annotation
/// targets, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    /// Inclusive start offset
    #[serde(deserialize_with = "null_as_default")]
    pub start_index: usize,
    /// Exclusive end offset
    #[serde(deserialize_with = "null_as_default")]
    pub end_index: usize,
    /// Replacement text (track changes) or comment body (comments)
    #[serde(deserialize_with = "null_as_default")]
    pub comment_content: String,
    /// Text the reviewer saw at the range, if supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commented_text: Option<String>,
    /// Caller-side identifier; accepts a JSON string or number
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            comment_content: String::new(),
            commented_text: None,
            id: "0".to_string(),
        }
    }
}

impl Annotation {
    /// Create an annotation over `start..end`
    pub fn new(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start_index: start,
            end_index: end,
            comment_content: content.into(),
            ..Default::default()
        }
    }

    /// Set the caller-side identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the text the reviewer saw at the range
    pub fn with_commented_text(mut self, text: impl Into<String>) -> Self {
        self.commented_text = Some(text.into());
        self
    }

    /// Number of characters covered
    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    /// Whether the range covers nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "annotation {} [{}, {})",
            self.id, self.start_index, self.end_index
        )
    }
}

/// An explicit `null` reads as the field's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Null => "0".to_string(),
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}
