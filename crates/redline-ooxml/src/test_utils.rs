//! Shared test fixtures for redline-ooxml
//!
//! Small hand-built packages standing in for user templates, plus helpers
//! to pull parts out of generated documents.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::archive::OoxmlArchive;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const PLACEHOLDER_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Template placeholder</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

/// Zip `(path, contents)` pairs into a package
pub fn zip_parts(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (path, contents) in parts {
        zip.start_file(*path, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

/// A `.dotx` with only content types, relationships and a placeholder body
///
/// No styles, numbering or document relationships are present.
pub fn create_minimal_template() -> Vec<u8> {
    zip_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        (
            "word/_rels/document.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
</Relationships>"#,
        ),
        ("word/document.xml", PLACEHOLDER_DOCUMENT),
    ])
}

/// A `.dotx` with a styles part whose third heading uses a localized ID
pub fn create_template_with_styles() -> Vec<u8> {
    zip_parts(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        (
            "word/_rels/document.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
        ),
        (
            "word/styles.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:styleId="Normal" w:default="1">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="1"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Ueberschrift3">
    <w:name w:val="heading 3"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="2"/></w:pPr>
  </w:style>
</w:styles>"#,
        ),
        ("word/document.xml", PLACEHOLDER_DOCUMENT),
    ])
}

/// Extract `word/document.xml` from a generated package
pub fn extract_document_xml(docx: &[u8]) -> String {
    extract_file(docx, "word/document.xml").unwrap()
}

/// Extract any part from a generated package
pub fn extract_file(docx: &[u8], path: &str) -> Option<String> {
    OoxmlArchive::from_bytes(docx).unwrap().get_string(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_template_parts() {
        let archive = OoxmlArchive::from_bytes(&create_minimal_template()).unwrap();

        assert!(archive.contains("[Content_Types].xml"));
        assert!(archive.contains("_rels/.rels"));
        assert!(archive.contains("word/document.xml"));
        assert!(!archive.contains("word/styles.xml"));
    }

    #[test]
    fn test_extract_file() {
        let template = create_template_with_styles();

        assert!(extract_file(&template, "word/styles.xml")
            .unwrap()
            .contains("Ueberschrift3"));
        assert!(extract_document_xml(&template).contains("Template placeholder"));
        assert!(extract_file(&template, "nonexistent.xml").is_none());
    }
}
