//! Templates for generated documents
//!
//! A template supplies every package part except the body: styles,
//! numbering, settings, headers and the like. Either the built-in template
//! or a user `.docx`/`.dotx` can be used.
//!
//! # Example
//!
//! ```no_run
//! use redline_ooxml::Template;
//!
//! let mut template = Template::load("corporate.dotx")?;
//! let styles = template.get_styles()?;
//! println!("{} styles", styles.len());
//! # Ok::<(), redline_ooxml::OoxmlError>(())
//! ```

use std::path::Path;

use tracing::debug;

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PATH, DOCUMENT_PATH, DOCUMENT_RELS_PATH, NUMBERING_PATH,
    PACKAGE_RELS_PATH, STYLES_PATH,
};
use crate::builtin;
use crate::content_types::{self, ContentTypes};
use crate::error::{OoxmlError, Result};
use crate::relationships::Relationships;
use crate::styles::StyleSheet;

/// Path of the settings part
const SETTINGS_PATH: &str = "word/settings.xml";

/// A Word template
#[derive(Debug, Clone)]
pub struct Template {
    archive: OoxmlArchive,
    /// Parsed stylesheet (cached)
    stylesheet: Option<StyleSheet>,
}

impl Default for Template {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Template {
    /// The built-in template
    pub fn builtin() -> Self {
        let mut archive = OoxmlArchive::new();

        let mut types = ContentTypes::new();
        types.set_override(&part_name(DOCUMENT_PATH), content_types::DOCUMENT_MAIN);
        types.set_override(&part_name(STYLES_PATH), content_types::STYLES);
        types.set_override(&part_name(NUMBERING_PATH), content_types::NUMBERING);
        types.set_override(&part_name(SETTINGS_PATH), content_types::SETTINGS);
        archive.set_string(CONTENT_TYPES_PATH, types.to_xml());

        let mut package_rels = Relationships::new();
        package_rels.add(Relationships::TYPE_OFFICE_DOCUMENT, DOCUMENT_PATH);
        archive.set_string(PACKAGE_RELS_PATH, package_rels.to_xml());

        let mut document_rels = Relationships::new();
        document_rels.add(Relationships::TYPE_STYLES, "styles.xml");
        document_rels.add(Relationships::TYPE_NUMBERING, "numbering.xml");
        document_rels.add(Relationships::TYPE_SETTINGS, "settings.xml");
        archive.set_string(DOCUMENT_RELS_PATH, document_rels.to_xml());

        archive.set_string(DOCUMENT_PATH, builtin::DOCUMENT_XML);
        archive.set_string(STYLES_PATH, builtin::STYLES_XML);
        archive.set_string(NUMBERING_PATH, builtin::NUMBERING_XML);
        archive.set_string(SETTINGS_PATH, builtin::SETTINGS_XML);

        Self {
            archive,
            stylesheet: None,
        }
    }

    /// Load a template from a `.docx` or `.dotx` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading template {}", path.as_ref().display());
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Load a template from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_bytes(bytes)?)
    }

    /// Wrap an unpacked package, checking it is a word processing document
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        archive.require(CONTENT_TYPES_PATH)?;
        let package_rels = Relationships::parse(archive.require(PACKAGE_RELS_PATH)?)?;

        let main = package_rels
            .find_by_type(Relationships::TYPE_OFFICE_DOCUMENT)
            .ok_or_else(|| {
                OoxmlError::InvalidStructure("package has no main document".to_string())
            })?;
        if main.target.trim_start_matches('/') != DOCUMENT_PATH {
            return Err(OoxmlError::InvalidStructure(format!(
                "main document is '{}', expected '{}'",
                main.target, DOCUMENT_PATH
            )));
        }
        archive.require(DOCUMENT_PATH)?;

        Ok(Self {
            archive,
            stylesheet: None,
        })
    }

    /// Parsed stylesheet; empty when the template has no styles part
    ///
    /// Styles are cached after first parse.
    pub fn get_styles(&mut self) -> Result<&StyleSheet> {
        if self.stylesheet.is_none() {
            let sheet = match self.archive.get(STYLES_PATH) {
                Some(xml) => StyleSheet::parse(xml)?,
                None => StyleSheet::default(),
            };
            self.stylesheet = Some(sheet);
        }
        Ok(self.stylesheet.get_or_insert_with(StyleSheet::default))
    }

    /// Relationships of the main document
    pub fn relationships(&self) -> Result<Relationships> {
        match self.archive.get(DOCUMENT_RELS_PATH) {
            Some(xml) => Relationships::parse(xml),
            None => Ok(Relationships::new()),
        }
    }

    /// Parsed `[Content_Types].xml`
    pub fn content_types(&self) -> Result<ContentTypes> {
        ContentTypes::parse(self.archive.require(CONTENT_TYPES_PATH)?)
    }

    /// Whether the template carries numbering definitions
    pub fn has_numbering(&self) -> bool {
        self.archive.contains(NUMBERING_PATH)
    }

    /// The underlying package
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Consume the template and return the underlying package
    pub fn into_archive(self) -> OoxmlArchive {
        self.archive
    }
}

/// Part name of a package path, e.g. `/word/styles.xml`
pub(crate) fn part_name(path: &str) -> String {
    format!("/{}", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_minimal_template, create_template_with_styles};

    #[test]
    fn test_builtin_parts() {
        let template = Template::builtin();
        let archive = template.archive();

        for path in [
            CONTENT_TYPES_PATH,
            PACKAGE_RELS_PATH,
            DOCUMENT_PATH,
            DOCUMENT_RELS_PATH,
            STYLES_PATH,
            NUMBERING_PATH,
            SETTINGS_PATH,
        ] {
            assert!(archive.contains(path), "missing {}", path);
        }
        assert!(template.has_numbering());
    }

    #[test]
    fn test_builtin_styles() {
        let mut template = Template::default();
        let styles = template.get_styles().unwrap();

        for id in [
            "Normal",
            "Heading1",
            "Heading9",
            "ListBullet",
            "ListNumber",
            "CommentText",
            "CommentReference",
        ] {
            assert!(styles.contains(id), "missing style {}", id);
        }
        assert_eq!(styles.default_paragraph.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_builtin_content_types_and_rels() {
        let template = Template::builtin();

        let types = template.content_types().unwrap();
        assert_eq!(
            types.content_type_of("/word/document.xml"),
            Some(content_types::DOCUMENT_MAIN)
        );
        assert_eq!(
            types.content_type_of("/word/numbering.xml"),
            Some(content_types::NUMBERING)
        );

        let rels = template.relationships().unwrap();
        assert!(rels.has_type(Relationships::TYPE_STYLES));
        assert!(rels.has_type(Relationships::TYPE_NUMBERING));
    }

    #[test]
    fn test_builtin_survives_roundtrip() {
        let bytes = Template::builtin().into_archive().to_bytes().unwrap();
        let mut template = Template::from_bytes(&bytes).unwrap();
        assert!(template.get_styles().unwrap().contains("Heading1"));
    }

    #[test]
    fn test_load_from_bytes() {
        let mut template = Template::from_bytes(&create_template_with_styles()).unwrap();
        let styles = template.get_styles().unwrap();

        assert!(styles.contains("Normal"));
        assert!(styles.contains("Heading2"));
        assert!(!template.has_numbering());
    }

    #[test]
    fn test_template_without_styles() {
        let mut template = Template::from_bytes(&create_minimal_template()).unwrap();
        assert!(template.get_styles().unwrap().is_empty());
        assert!(template.relationships().unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.dotx");
        std::fs::write(&path, create_template_with_styles()).unwrap();

        assert!(Template::load(&path).is_ok());
        assert!(matches!(
            Template::load(dir.path().join("missing.dotx")),
            Err(OoxmlError::Io(_))
        ));
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(matches!(
            Template::from_bytes(b"not a zip file"),
            Err(OoxmlError::Archive(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_main_part() {
        let mut archive = OoxmlArchive::new();
        archive.set_string(CONTENT_TYPES_PATH, ContentTypes::new().to_xml());
        let mut rels = Relationships::new();
        rels.add(Relationships::TYPE_OFFICE_DOCUMENT, "xl/workbook.xml");
        archive.set_string(PACKAGE_RELS_PATH, rels.to_xml());

        assert!(matches!(
            Template::from_archive(archive),
            Err(OoxmlError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_rejects_missing_content_types() {
        assert!(matches!(
            Template::from_archive(OoxmlArchive::new()),
            Err(OoxmlError::MissingFile(_))
        ));
    }
}
