//! `[Content_Types].xml` handling
//!
//! Every part in a package needs a content type, either through a default
//! keyed on its extension or an override keyed on its part name.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::xml::escape_xml;

/// Content types namespace
pub const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Main document part of a `.docx`
pub const DOCUMENT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
/// Main document part of a `.dotx`
pub const TEMPLATE_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";
/// Styles part
pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
/// Numbering part
pub const NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
/// Settings part
pub const SETTINGS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
/// Comments part
pub const COMMENTS: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
/// Core properties part
pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
/// Relationship parts
pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Parsed content types, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    defaults: Vec<(String, String)>,
    overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Create the minimal set every package needs
    pub fn new() -> Self {
        let mut types = Self::default();
        types.set_default("rels", RELATIONSHIPS);
        types.set_default("xml", "application/xml");
        types
    }

    /// Parse `[Content_Types].xml`
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut types = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let mut key = None;
                    let mut content_type = None;
                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = attr.unescape_value().ok().map(|v| v.into_owned());
                        match attr.key.as_ref() {
                            b"Extension" | b"PartName" => key = value,
                            b"ContentType" => content_type = value,
                            _ => {}
                        }
                    }
                    if let (Some(key), Some(content_type)) = (key, content_type) {
                        match e.local_name().as_ref() {
                            b"Default" => types.defaults.push((key, content_type)),
                            b"Override" => types.overrides.push((key, content_type)),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Set the content type for an extension
    pub fn set_default(&mut self, extension: &str, content_type: &str) {
        set_entry(&mut self.defaults, extension, content_type);
    }

    /// Set the content type for a part, e.g. `/word/comments.xml`
    pub fn set_override(&mut self, part_name: &str, content_type: &str) {
        set_entry(&mut self.overrides, part_name, content_type);
    }

    /// Content type of a part, from its override or its extension default
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p == part_name) {
            return Some(ct);
        }
        let extension = part_name.rsplit('.').next()?;
        self.defaults
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, ct)| ct.as_str())
    }

    /// Serialize to XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, CONTENT_TYPES_NS));
        xml.push('\n');
        for (extension, ct) in &self.defaults {
            xml.push_str(&format!(
                "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(extension),
                escape_xml(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                "  <Override PartName=\"{}\" ContentType=\"{}\"/>\n",
                escape_xml(part),
                escape_xml(ct)
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

fn set_entry(entries: &mut Vec<(String, String)>, key: &str, content_type: &str) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = content_type.to_string(),
        None => entries.push((key.to_string(), content_type.to_string())),
    }
}
