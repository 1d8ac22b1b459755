//! Relationship parts (`_rels/*.rels`)
//!
//! Relationships tie a source part to its targets by `rIdN` identifiers.
//! The writer uses them to hook styles, numbering and comments into the
//! main document.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::escape_xml;

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// A single relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID, e.g. `rId3`
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part
    pub target: String,
}

/// Relationships of one source part, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Main document relationship type
    pub const TYPE_OFFICE_DOCUMENT: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Core properties relationship type
    pub const TYPE_CORE_PROPERTIES: &'static str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Numbering relationship type
    pub const TYPE_NUMBERING: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    /// Settings relationship type
    pub const TYPE_SETTINGS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    /// Comments relationship type
    pub const TYPE_COMMENTS: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";

    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.rels` part
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut rels = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = None;
                    let mut rel_type = String::new();
                    let mut target = None;

                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let Ok(value) = attr.unescape_value() else {
                            continue;
                        };
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value.into_owned()),
                            b"Type" => rel_type = value.into_owned(),
                            b"Target" => target = Some(value.into_owned()),
                            _ => {}
                        }
                    }

                    if let (Some(id), Some(target)) = (id, target) {
                        rels.entries.push(Relationship {
                            id,
                            rel_type,
                            target,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Add a relationship and return its generated ID
    ///
    /// IDs continue after the highest numeric `rIdN` already present.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = self.next_id();
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// Return the ID of the first relationship of `rel_type`, adding one
    /// pointing at `target` when none exists
    pub fn ensure(&mut self, rel_type: &str, target: &str) -> String {
        match self.find_by_type(rel_type) {
            Some(rel) => rel.id.clone(),
            None => self.add(rel_type, target),
        }
    }

    /// The ID the next call to [`Relationships::add`] will use
    pub fn next_id(&self) -> String {
        let max = self
            .entries
            .iter()
            .filter_map(|r| id_number(&r.id))
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }

    /// Find a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// First relationship of a type
    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Whether a relationship of this type exists
    pub fn has_type(&self, rel_type: &str) -> bool {
        self.find_by_type(rel_type).is_some()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no relationships
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in document order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Serialize to a `.rels` part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, RELATIONSHIPS_NS));
        xml.push('\n');
        for rel in &self.entries {
            xml.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>\n",
                escape_xml(&rel.id),
                escape_xml(&rel.rel_type),
                escape_xml(&rel.target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Numeric part of an `rIdN` identifier
fn id_number(id: &str) -> Option<u32> {
    let digits = id
        .strip_prefix("rId")
        .or_else(|| id.strip_prefix("RId"))
        .or_else(|| id.strip_prefix("rid"))?;
    digits.parse().ok()
}
