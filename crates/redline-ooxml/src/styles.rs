//! Style definitions (word/styles.xml)
//!
//! [`StyleSheet`] reads the styles a template defines; [`StyleMap`] decides
//! which style ID each kind of generated paragraph and run refers to.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

/// A Word style definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name, e.g. `heading 1`
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Base style ID
    pub based_on: Option<String>,
    /// Outline level (0-8, where 0 = Heading 1)
    pub outline_level: Option<u8>,
}

/// Styles defined by a package
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut sheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current: Option<(Style, bool)> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    if name.as_ref() == b"style" {
                        current = Some(start_style(e));
                    } else if let Some((style, _)) = current.as_mut() {
                        match name.as_ref() {
                            b"name" => {
                                if let Some(val) = get_attr(e, b"w:val") {
                                    style.name = val;
                                }
                            }
                            b"basedOn" => style.based_on = get_attr(e, b"w:val"),
                            b"outlineLvl" => {
                                style.outline_level =
                                    get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => {
                    if let Some((style, is_default)) = current.take() {
                        if !style.id.is_empty() {
                            if is_default && style.style_type == StyleType::Paragraph {
                                sheet.default_paragraph = Some(style.id.clone());
                            }
                            sheet.styles.insert(style.id.clone(), style);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Check if a style ID exists
    pub fn contains(&self, id: &str) -> bool {
        self.styles.contains_key(id)
    }

    /// Find a style by display name, ignoring case
    pub fn find_by_name(&self, name: &str) -> Option<&Style> {
        self.styles
            .values()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if no styles are defined
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// Begin a style from its `w:style` element; the flag marks `w:default="1"`
fn start_style(e: &BytesStart) -> (Style, bool) {
    let style_type = match get_attr(e, b"w:type").as_deref() {
        Some("character") => StyleType::Character,
        Some("table") => StyleType::Table,
        Some("numbering") => StyleType::Numbering,
        _ => StyleType::Paragraph,
    };
    let id = get_attr(e, b"w:styleId").unwrap_or_default();
    let is_default = get_attr(e, b"w:default").as_deref() == Some("1");
    (
        Style {
            name: id.clone(),
            id,
            style_type,
            based_on: None,
            outline_level: None,
        },
        is_default,
    )
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Kinds of generated content that carry a style reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Heading level 1-9
    Heading(u8),
    /// Normal paragraph
    Paragraph,
    /// Unordered list item
    ListBullet,
    /// Ordered list item
    ListNumber,
    /// Paragraphs inside a margin comment
    CommentText,
    /// The run anchoring a margin comment
    CommentReference,
}

impl ElementType {
    /// Style ID used by the built-in template
    fn builtin_id(self) -> String {
        match self {
            ElementType::Heading(level) => format!("Heading{}", level.clamp(1, 9)),
            ElementType::Paragraph => "Normal".to_string(),
            ElementType::ListBullet => "ListBullet".to_string(),
            ElementType::ListNumber => "ListNumber".to_string(),
            ElementType::CommentText => "CommentText".to_string(),
            ElementType::CommentReference => "CommentReference".to_string(),
        }
    }

    /// Display name Word gives the built-in style
    fn builtin_name(self) -> String {
        match self {
            ElementType::Heading(level) => format!("heading {}", level.clamp(1, 9)),
            ElementType::Paragraph => "Normal".to_string(),
            ElementType::ListBullet => "List Bullet".to_string(),
            ElementType::ListNumber => "List Number".to_string(),
            ElementType::CommentText => "annotation text".to_string(),
            ElementType::CommentReference => "annotation reference".to_string(),
        }
    }

    fn all() -> impl Iterator<Item = ElementType> {
        (1..=9).map(ElementType::Heading).chain([
            ElementType::Paragraph,
            ElementType::ListBullet,
            ElementType::ListNumber,
            ElementType::CommentText,
            ElementType::CommentReference,
        ])
    }
}

/// Maps generated content to Word style IDs
///
/// # Example
///
/// ```
/// use redline_ooxml::styles::{ElementType, StyleMap};
///
/// let mut map = StyleMap::default();
/// map.set(ElementType::Heading(1), "Title1");
///
/// assert_eq!(map.heading(1), "Title1");
/// assert_eq!(map.heading(2), "Heading2");
/// assert_eq!(map.list(true), "ListNumber");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    overrides: HashMap<ElementType, String>,
}

impl StyleMap {
    /// Map an element to a style ID
    pub fn set(&mut self, element: ElementType, style_id: impl Into<String>) {
        self.overrides.insert(element, style_id.into());
    }

    /// Style ID for an element
    pub fn get(&self, element: ElementType) -> String {
        self.overrides
            .get(&element)
            .cloned()
            .unwrap_or_else(|| element.builtin_id())
    }

    /// Style ID for a heading level (clamped to 1-9)
    pub fn heading(&self, level: u8) -> String {
        self.get(ElementType::Heading(level.clamp(1, 9)))
    }

    /// Style ID for paragraphs
    pub fn paragraph(&self) -> String {
        self.get(ElementType::Paragraph)
    }

    /// Style ID for list items
    pub fn list(&self, ordered: bool) -> String {
        if ordered {
            self.get(ElementType::ListNumber)
        } else {
            self.get(ElementType::ListBullet)
        }
    }

    /// Adapt to the styles a template actually defines
    ///
    /// When the built-in ID is missing, a style with the built-in display
    /// name is used instead (localized templates keep the English name but
    /// not always the ID); failing that, the default paragraph style stands
    /// in for the paragraph role.
    pub fn from_stylesheet(sheet: &StyleSheet) -> Self {
        let mut map = StyleMap::default();

        for element in ElementType::all() {
            if sheet.contains(&element.builtin_id()) {
                continue;
            }
            if let Some(style) = sheet.find_by_name(&element.builtin_name()) {
                map.set(element, style.id.clone());
            } else if element == ElementType::Paragraph {
                if let Some(default) = &sheet.default_paragraph {
                    map.set(element, default.clone());
                }
            }
        }

        map
    }

    /// Mapped style IDs the stylesheet does not define
    pub fn missing(&self, sheet: &StyleSheet) -> Vec<String> {
        let mut missing: Vec<String> = ElementType::all()
            .map(|e| self.get(e))
            .filter(|id| !sheet.contains(id))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}
