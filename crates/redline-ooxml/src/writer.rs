//! DOCX Writer
//!
//! Writes a [`redline_ast::Document`] into a template's package: the body
//! replaces `word/document.xml`, margin comments go to `word/comments.xml`,
//! and the relationships, content types and core properties are updated to
//! match.
//!
//! # Example
//!
//! ```
//! use redline_ast::{Block, Document};
//! use redline_ooxml::DocxWriter;
//!
//! let mut doc = Document::new();
//! doc.push(Block::heading(1, "Summary"));
//! doc.push(Block::paragraph("Hello world"));
//!
//! let bytes = DocxWriter::generate_default(&doc)?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), redline_ooxml::OoxmlError>(())
//! ```

use redline_ast::{Block, BlockKind, Comment, Document, Inline, Revision, Run, RunStyle};
use tracing::debug;

use crate::archive::{
    OoxmlArchive, COMMENTS_PATH, CONTENT_TYPES_PATH, CORE_PROPERTIES_PATH, DOCUMENT_PATH,
    DOCUMENT_RELS_PATH, NUMBERING_PATH, PACKAGE_RELS_PATH,
};
use crate::builtin;
use crate::content_types::{self, ContentTypes};
use crate::error::Result;
use crate::relationships::Relationships;
use crate::styles::{ElementType, StyleMap};
use crate::template::{part_name, Template};
use crate::xml::escape_xml;

/// Numbering instance for bullet lists
const BULLET_NUM_ID: u32 = 1;
/// Numbering instance for numbered lists
const DECIMAL_NUM_ID: u32 = 2;

/// Section properties used when the template has none: US Letter, 1" margins
const DEFAULT_SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/><w:cols w:space="720"/><w:docGrid w:linePitch="360"/></w:sectPr>"#;

const EMPTY_CORE_PROPERTIES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"></cp:coreProperties>"#;

/// How a run's text is emitted
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Normal,
    Deleted,
}

/// DOCX Writer for generating DOCX files from a review document
#[derive(Debug, Default)]
pub struct DocxWriter {
    /// XML output buffer
    output: String,
    /// Explicit style mapping; adapted from the template when unset
    style_map: Option<StyleMap>,
    /// Core property `dc:title`
    title: Option<String>,
    /// Core property `dc:creator`
    author: Option<String>,
    /// Core property `dcterms:modified`
    modified: Option<String>,
}

impl DocxWriter {
    /// Create a new DocxWriter
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed style mapping instead of adapting to the template
    pub fn with_style_map(mut self, style_map: StyleMap) -> Self {
        self.style_map = Some(style_map);
        self
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the document author
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = Some(author.into());
    }

    /// Set the last-modified timestamp (ISO-8601)
    pub fn set_modified(&mut self, modified: impl Into<String>) {
        self.modified = Some(modified.into());
    }

    /// Generate a DOCX file using the built-in template
    pub fn generate_default(doc: &Document) -> Result<Vec<u8>> {
        Self::new().generate_with_template(doc, Template::builtin())
    }

    /// Generate a DOCX file from template bytes
    pub fn generate(doc: &Document, template: &[u8]) -> Result<Vec<u8>> {
        Self::new().generate_with_template(doc, Template::from_bytes(template)?)
    }

    /// Generate a DOCX file from a loaded template
    pub fn generate_from_template(doc: &Document, template: Template) -> Result<Vec<u8>> {
        Self::new().generate_with_template(doc, template)
    }

    /// Generate a DOCX file using this writer's settings
    pub fn generate_with_template(
        mut self,
        doc: &Document,
        mut template: Template,
    ) -> Result<Vec<u8>> {
        let style_map = match self.style_map.take() {
            Some(map) => map,
            None => StyleMap::from_stylesheet(template.get_styles()?),
        };
        let mut types = template.content_types()?;
        let mut document_rels = template.relationships()?;
        let has_numbering = template.has_numbering();
        let mut archive = template.into_archive();

        debug!(
            "Writing {} block(s) and {} comment(s)",
            doc.blocks.len(),
            doc.comments.len()
        );

        let section = archive
            .get_string(DOCUMENT_PATH)
            .and_then(|xml| section_properties(&xml))
            .unwrap_or_else(|| DEFAULT_SECTION.to_string());
        let document_xml = self.generate_document_xml(doc, &style_map, &section);
        archive.set_string(DOCUMENT_PATH, document_xml);
        // A .dotx main part becomes a .docx main part
        types.set_override(&part_name(DOCUMENT_PATH), content_types::DOCUMENT_MAIN);

        if doc.has_lists() && !has_numbering {
            debug!("Template has no numbering part; adding the built-in one");
            archive.set_string(NUMBERING_PATH, builtin::NUMBERING_XML);
            document_rels.ensure(Relationships::TYPE_NUMBERING, "numbering.xml");
            types.set_override(&part_name(NUMBERING_PATH), content_types::NUMBERING);
        }

        if !doc.comments.is_empty() {
            let comments_xml = generate_comments_xml(&doc.comments, &style_map);
            archive.set_string(COMMENTS_PATH, comments_xml);
            document_rels.ensure(Relationships::TYPE_COMMENTS, "comments.xml");
            types.set_override(&part_name(COMMENTS_PATH), content_types::COMMENTS);
        }

        self.update_core_properties(&mut archive, &mut types)?;

        archive.set_string(DOCUMENT_RELS_PATH, document_rels.to_xml());
        archive.set_string(CONTENT_TYPES_PATH, types.to_xml());

        archive.to_bytes()
    }

    /// Write title, creator and modified date into `docProps/core.xml`
    fn update_core_properties(
        &self,
        archive: &mut OoxmlArchive,
        types: &mut ContentTypes,
    ) -> Result<()> {
        let fields = [
            ("dc:title", self.title.as_deref()),
            ("dc:creator", self.author.as_deref()),
            ("dcterms:modified", self.modified.as_deref()),
        ];
        if fields.iter().all(|(_, value)| value.is_none()) {
            return Ok(());
        }

        let mut core = archive
            .get_string(CORE_PROPERTIES_PATH)
            .unwrap_or_else(|| EMPTY_CORE_PROPERTIES.to_string());
        for (tag, value) in fields {
            if let Some(value) = value {
                core = set_core_element(&core, tag, value);
            }
        }
        archive.set_string(CORE_PROPERTIES_PATH, core);
        types.set_override(&part_name(CORE_PROPERTIES_PATH), content_types::CORE_PROPERTIES);

        let mut package_rels = match archive.get(PACKAGE_RELS_PATH) {
            Some(xml) => Relationships::parse(xml)?,
            None => Relationships::new(),
        };
        if !package_rels.has_type(Relationships::TYPE_CORE_PROPERTIES) {
            package_rels.add(Relationships::TYPE_CORE_PROPERTIES, CORE_PROPERTIES_PATH);
            archive.set_string(PACKAGE_RELS_PATH, package_rels.to_xml());
        }
        Ok(())
    }

    /// Generate the complete document.xml content
    fn generate_document_xml(&mut self, doc: &Document, styles: &StyleMap, section: &str) -> String {
        self.output.clear();

        self.output
            .push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.output.push('\n');
        self.output.push_str(r#"<w:document "#);
        self.output
            .push_str(r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#);
        self.output.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );
        self.output.push('\n');
        self.output.push_str("<w:body>\n");

        for block in &doc.blocks {
            self.generate_block(block, styles);
        }

        self.output.push_str(section);
        self.output.push('\n');
        self.output.push_str("</w:body>\n");
        self.output.push_str("</w:document>");

        std::mem::take(&mut self.output)
    }

    /// Generate XML for one paragraph-level block
    fn generate_block(&mut self, block: &Block, styles: &StyleMap) {
        self.output.push_str("<w:p>");
        self.output.push_str("<w:pPr>");

        match block.kind {
            BlockKind::Heading(level) => {
                self.push_paragraph_style(&styles.heading(level));
            }
            BlockKind::Paragraph => {
                self.push_paragraph_style(&styles.paragraph());
            }
            BlockKind::ListItem { ordered, level } => {
                self.push_paragraph_style(&styles.list(ordered));
                let num_id = if ordered { DECIMAL_NUM_ID } else { BULLET_NUM_ID };
                self.output.push_str(&format!(
                    "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
                    level.min(8),
                    num_id
                ));
            }
        }

        self.output.push_str("</w:pPr>\n");

        for inline in &block.content {
            self.generate_inline(inline, styles);
        }

        self.output.push_str("</w:p>\n");
    }

    fn push_paragraph_style(&mut self, style: &str) {
        self.output
            .push_str(&format!("<w:pStyle w:val=\"{}\"/>", escape_xml(style)));
    }

    fn generate_inline(&mut self, inline: &Inline, styles: &StyleMap) {
        match inline {
            Inline::Run(run) => self.generate_run(run, TextKind::Normal),
            Inline::Deletion { revision, runs } => {
                self.open_revision("w:del", revision);
                for run in runs {
                    self.generate_run(run, TextKind::Deleted);
                }
                self.output.push_str("</w:del>\n");
            }
            Inline::Insertion { revision, runs } => {
                self.open_revision("w:ins", revision);
                for run in runs {
                    self.generate_run(run, TextKind::Normal);
                }
                self.output.push_str("</w:ins>\n");
            }
            Inline::CommentRangeStart(id) => {
                self.output
                    .push_str(&format!("<w:commentRangeStart w:id=\"{}\"/>\n", id));
            }
            Inline::CommentRangeEnd(id) => {
                self.output
                    .push_str(&format!("<w:commentRangeEnd w:id=\"{}\"/>\n", id));
            }
            Inline::CommentReference(id) => {
                self.output.push_str(&format!(
                    "<w:r><w:rPr><w:rStyle w:val=\"{}\"/></w:rPr><w:commentReference w:id=\"{}\"/></w:r>\n",
                    escape_xml(&styles.get(ElementType::CommentReference)),
                    id
                ));
            }
        }
    }

    fn open_revision(&mut self, tag: &str, revision: &Revision) {
        self.output.push_str(&format!(
            "<{} w:id=\"{}\" w:author=\"{}\" w:date=\"{}\">\n",
            tag,
            revision.id,
            escape_xml(&revision.author),
            escape_xml(&revision.date)
        ));
    }

    /// Generate a `w:r`, turning newlines into breaks and tabs into tab stops
    fn generate_run(&mut self, run: &Run, kind: TextKind) {
        if run.text.is_empty() {
            return;
        }

        self.output.push_str("<w:r>");
        push_run_properties(&mut self.output, &run.style);

        let text_tag = match kind {
            TextKind::Normal => "w:t",
            TextKind::Deleted => "w:delText",
        };
        let mut segment = String::new();
        for ch in run.text.chars() {
            match ch {
                '\n' | '\t' => {
                    push_text(&mut self.output, text_tag, &segment);
                    segment.clear();
                    self.output
                        .push_str(if ch == '\n' { "<w:br/>" } else { "<w:tab/>" });
                }
                '\r' => {}
                c => segment.push(c),
            }
        }
        push_text(&mut self.output, text_tag, &segment);

        self.output.push_str("</w:r>\n");
    }
}

fn push_text(out: &mut String, tag: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<{} xml:space=\"preserve\">{}</{}>",
        tag,
        escape_xml(text),
        tag
    ));
}

fn push_run_properties(out: &mut String, style: &RunStyle) {
    if style.is_plain() {
        return;
    }
    out.push_str("<w:rPr>");
    if style.monospace {
        out.push_str(
            "<w:rFonts w:ascii=\"Courier New\" w:hAnsi=\"Courier New\" w:cs=\"Courier New\"/>",
        );
    }
    if style.bold {
        out.push_str("<w:b/>");
    }
    if style.italic {
        out.push_str("<w:i/>");
    }
    if let Some(colour) = style.highlight {
        out.push_str(&format!("<w:highlight w:val=\"{}\"/>", colour));
    }
    if style.underline {
        out.push_str("<w:u w:val=\"single\"/>");
    }
    out.push_str("</w:rPr>");
}

/// Generate `word/comments.xml`
fn generate_comments_xml(comments: &[Comment], styles: &StyleMap) -> String {
    let text_style = escape_xml(&styles.get(ElementType::CommentText));
    let reference_style = escape_xml(&styles.get(ElementType::CommentReference));

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    );

    for comment in comments {
        xml.push_str(&format!(
            "\n<w:comment w:id=\"{}\" w:author=\"{}\" w:date=\"{}\" w:initials=\"{}\">",
            comment.id,
            escape_xml(&comment.author),
            escape_xml(&comment.date),
            escape_xml(&comment.initials)
        ));

        for (index, line) in comment.text.split('\n').enumerate() {
            xml.push_str(&format!(
                "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
                text_style
            ));
            if index == 0 {
                xml.push_str(&format!(
                    "<w:r><w:rPr><w:rStyle w:val=\"{}\"/></w:rPr><w:annotationRef/></w:r>",
                    reference_style
                ));
            }
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                xml.push_str(&format!(
                    "<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r>",
                    escape_xml(line)
                ));
            }
            xml.push_str("</w:p>");
        }

        xml.push_str("</w:comment>");
    }

    xml.push_str("\n</w:comments>");
    xml
}

/// The body-level `w:sectPr` of a document, if any
fn section_properties(document_xml: &str) -> Option<String> {
    let body_end = document_xml.rfind("</w:body>")?;
    let start = document_xml[..body_end].rfind("<w:sectPr")?;
    let rest = &document_xml[start..body_end];

    let tag_end = rest.find('>')?;
    if rest[..tag_end].ends_with('/') {
        return Some(rest[..=tag_end].to_string());
    }
    let close = "</w:sectPr>";
    let end = rest.find(close)?;
    Some(rest[..end + close.len()].to_string())
}

/// Replace or insert one core property element
fn set_core_element(core: &str, tag: &str, value: &str) -> String {
    let element = if tag == "dcterms:modified" {
        format!(
            "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
            escape_xml(value)
        )
    } else {
        format!("<{}>{}</{}>", tag, escape_xml(value), tag)
    };

    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let existing = core.match_indices(&open).find_map(|(start, _)| {
        // Skip longer names sharing the prefix
        let next = core[start + open.len()..].chars().next()?;
        if next != '>' && next != ' ' && next != '/' {
            return None;
        }
        let rest = &core[start..];
        let tag_end = rest.find('>')?;
        let end = if rest[..tag_end].ends_with('/') {
            tag_end + 1
        } else {
            rest.find(&close)? + close.len()
        };
        Some((start, start + end))
    });

    match existing {
        Some((start, end)) => format!("{}{}{}", &core[..start], element, &core[end..]),
        None => core.replacen(
            "</cp:coreProperties>",
            &format!("{}</cp:coreProperties>", element),
            1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_minimal_template, create_template_with_styles, extract_file};
    use redline_ast::{Attribution, HighlightColor};

    fn revision(id: u32) -> Revision {
        Revision {
            id,
            author: "Reviewer".to_string(),
            date: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn render_body(doc: &Document) -> String {
        let mut writer = DocxWriter::new();
        writer.generate_document_xml(doc, &StyleMap::default(), DEFAULT_SECTION)
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let mut doc = Document::new();
        doc.push(Block::heading(1, "Sample Content"));
        doc.push(Block::heading(3, "Deeper"));
        doc.push(Block::paragraph("Body"));
        doc.push(Block::paragraph(""));

        let xml = render_body(&doc);
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading3\"/>"));
        assert!(xml.contains("<w:t xml:space=\"preserve\">Body</w:t>"));
        assert_eq!(xml.matches("<w:p>").count(), 4);
        assert!(xml.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
    }

    #[test]
    fn test_list_items() {
        let mut doc = Document::new();
        doc.push(Block::new(
            BlockKind::ListItem {
                ordered: false,
                level: 0,
            },
            vec![Inline::text("Bullet")],
        ));
        doc.push(Block::new(
            BlockKind::ListItem {
                ordered: true,
                level: 1,
            },
            vec![Inline::text("Numbered")],
        ));

        let xml = render_body(&doc);
        assert!(xml.contains(
            "<w:pStyle w:val=\"ListBullet\"/><w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"1\"/></w:numPr>"
        ));
        assert!(xml.contains(
            "<w:pStyle w:val=\"ListNumber\"/><w:numPr><w:ilvl w:val=\"1\"/><w:numId w:val=\"2\"/></w:numPr>"
        ));
    }

    #[test]
    fn test_run_formatting() {
        let style = RunStyle {
            bold: true,
            italic: true,
            underline: true,
            monospace: true,
            highlight: Some(HighlightColor::DarkYellow),
        };
        let mut out = String::new();
        push_run_properties(&mut out, &style);

        assert_eq!(
            out,
            "<w:rPr><w:rFonts w:ascii=\"Courier New\" w:hAnsi=\"Courier New\" w:cs=\"Courier New\"/><w:b/><w:i/><w:highlight w:val=\"darkYellow\"/><w:u w:val=\"single\"/></w:rPr>"
        );

        let mut plain = String::new();
        push_run_properties(&mut plain, &RunStyle::default());
        assert!(plain.is_empty());
    }

    #[test]
    fn test_breaks_and_tabs() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("one\ntwo\tthree\r\n"));

        let xml = render_body(&doc);
        assert!(xml.contains(
            "<w:t xml:space=\"preserve\">one</w:t><w:br/><w:t xml:space=\"preserve\">two</w:t><w:tab/><w:t xml:space=\"preserve\">three</w:t><w:br/></w:r>"
        ));
    }

    #[test]
    fn test_tracked_changes() {
        let mut doc = Document::new();
        doc.push(Block::new(
            BlockKind::Paragraph,
            vec![
                Inline::text("Hello "),
                Inline::Deletion {
                    revision: revision(1),
                    runs: vec![Run::new("world")],
                },
                Inline::Insertion {
                    revision: revision(2),
                    runs: vec![Run::new("there")],
                },
            ],
        ));

        let xml = render_body(&doc);
        assert!(xml.contains(
            "<w:del w:id=\"1\" w:author=\"Reviewer\" w:date=\"2024-01-01T00:00:00Z\">"
        ));
        assert!(xml.contains("<w:delText xml:space=\"preserve\">world</w:delText>"));
        assert!(xml.contains("<w:ins w:id=\"2\" w:author=\"Reviewer\""));
        assert!(xml.contains("<w:t xml:space=\"preserve\">there</w:t>"));
        assert!(!xml.contains("<w:t xml:space=\"preserve\">world</w:t>"));
    }

    #[test]
    fn test_comment_markers() {
        let mut doc = Document::new();
        doc.push(Block::new(
            BlockKind::Paragraph,
            vec![
                Inline::CommentRangeStart(0),
                Inline::text("commented"),
                Inline::CommentRangeEnd(0),
                Inline::CommentReference(0),
            ],
        ));

        let xml = render_body(&doc);
        let start = xml.find("<w:commentRangeStart w:id=\"0\"/>").unwrap();
        let text = xml.find("commented</w:t>").unwrap();
        let end = xml.find("<w:commentRangeEnd w:id=\"0\"/>").unwrap();
        let reference = xml.find("<w:commentReference w:id=\"0\"/>").unwrap();
        assert!(start < text && text < end && end < reference);
        assert!(xml.contains("<w:rStyle w:val=\"CommentReference\"/>"));
    }

    #[test]
    fn test_comments_xml() {
        let attribution = Attribution::new("A & B", "AB", "2024-01-01T00:00:00Z");
        let comments = vec![Comment {
            id: 0,
            author: attribution.author,
            initials: attribution.initials,
            date: attribution.date,
            text: "Use <em>\nsecond line".to_string(),
        }];

        let xml = generate_comments_xml(&comments, &StyleMap::default());
        assert!(xml.contains(
            "<w:comment w:id=\"0\" w:author=\"A &amp; B\" w:date=\"2024-01-01T00:00:00Z\" w:initials=\"AB\">"
        ));
        assert!(xml.contains("Use &lt;em&gt;"));
        assert!(xml.contains("second line"));
        assert_eq!(xml.matches("<w:annotationRef/>").count(), 1);
        assert_eq!(xml.matches("<w:pStyle w:val=\"CommentText\"/>").count(), 2);
    }

    #[test]
    fn test_section_properties_from_template() {
        let xml = r#"<w:document><w:body><w:p/><w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#;
        assert_eq!(
            section_properties(xml).as_deref(),
            Some(r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#)
        );
        assert_eq!(
            section_properties("<w:document><w:body><w:sectPr/></w:body></w:document>")
                .as_deref(),
            Some("<w:sectPr/>")
        );
        assert_eq!(section_properties("<w:document><w:body/></w:document>"), None);
    }

    #[test]
    fn test_set_core_element() {
        let core = r#"<cp:coreProperties><dc:title>Old</dc:title><dc:titleExtra>x</dc:titleExtra></cp:coreProperties>"#;

        let updated = set_core_element(core, "dc:title", "New & improved");
        assert!(updated.contains("<dc:title>New &amp; improved</dc:title>"));
        assert!(updated.contains("<dc:titleExtra>x</dc:titleExtra>"));

        let updated = set_core_element(&updated, "dc:creator", "Reviewer");
        assert!(updated.ends_with("<dc:creator>Reviewer</dc:creator></cp:coreProperties>"));

        let updated = set_core_element("<cp:coreProperties><dc:title/></cp:coreProperties>", "dc:title", "T");
        assert_eq!(updated, "<cp:coreProperties><dc:title>T</dc:title></cp:coreProperties>");
    }

    #[test]
    fn test_generate_default_package() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("Hello"));

        let bytes = DocxWriter::generate_default(&doc).unwrap();
        let archive = OoxmlArchive::from_bytes(&bytes).unwrap();

        assert!(archive.contains(DOCUMENT_PATH));
        assert!(!archive.contains(COMMENTS_PATH));
        assert!(!archive.contains(CORE_PROPERTIES_PATH));
        assert!(archive
            .get_string(DOCUMENT_PATH)
            .unwrap()
            .contains("Hello"));
    }

    #[test]
    fn test_generate_adds_comments_part() {
        let mut doc = Document::new();
        doc.push(Block::new(
            BlockKind::Paragraph,
            vec![
                Inline::CommentRangeStart(0),
                Inline::text("x"),
                Inline::CommentRangeEnd(0),
                Inline::CommentReference(0),
            ],
        ));
        doc.comments.push(Comment {
            id: 0,
            author: "Reviewer".to_string(),
            initials: "R".to_string(),
            date: "2024-01-01T00:00:00Z".to_string(),
            text: "note".to_string(),
        });

        let bytes = DocxWriter::generate_default(&doc).unwrap();

        let rels = extract_file(&bytes, DOCUMENT_RELS_PATH).unwrap();
        assert!(rels.contains(Relationships::TYPE_COMMENTS));
        assert!(rels.contains("Target=\"comments.xml\""));
        let types = extract_file(&bytes, CONTENT_TYPES_PATH).unwrap();
        assert!(types.contains(content_types::COMMENTS));
        assert!(extract_file(&bytes, COMMENTS_PATH).unwrap().contains("note"));
    }

    #[test]
    fn test_generate_adds_numbering_to_bare_template() {
        let mut doc = Document::new();
        doc.push(Block::new(
            BlockKind::ListItem {
                ordered: false,
                level: 0,
            },
            vec![Inline::text("item")],
        ));

        let bytes = DocxWriter::generate(&doc, &create_minimal_template()).unwrap();

        assert!(extract_file(&bytes, NUMBERING_PATH).is_some());
        let rels = Relationships::parse(extract_file(&bytes, DOCUMENT_RELS_PATH).unwrap().as_bytes())
            .unwrap();
        assert!(rels.has_type(Relationships::TYPE_NUMBERING));
        let types = extract_file(&bytes, CONTENT_TYPES_PATH).unwrap();
        assert!(types.contains(content_types::DOCUMENT_MAIN));
        assert!(!types.contains(content_types::TEMPLATE_MAIN));
    }

    #[test]
    fn test_generate_without_lists_skips_numbering() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("plain"));

        let bytes = DocxWriter::generate(&doc, &create_minimal_template()).unwrap();
        assert!(extract_file(&bytes, NUMBERING_PATH).is_none());
    }

    #[test]
    fn test_generate_adapts_to_template_styles() {
        let mut doc = Document::new();
        doc.push(Block::heading(3, "Localized"));

        let bytes = DocxWriter::generate(&doc, &create_template_with_styles()).unwrap();
        let xml = extract_file(&bytes, DOCUMENT_PATH).unwrap();
        assert!(xml.contains("<w:pStyle w:val=\"Ueberschrift3\"/>"));
        assert!(!xml.contains("Template placeholder"));
    }

    #[test]
    fn test_explicit_style_map_wins() {
        let mut doc = Document::new();
        doc.push(Block::paragraph("Body"));

        let mut map = StyleMap::default();
        map.set(ElementType::Paragraph, "BodyText");
        let bytes = DocxWriter::new()
            .with_style_map(map)
            .generate_with_template(&doc, Template::builtin())
            .unwrap();

        let xml = extract_file(&bytes, DOCUMENT_PATH).unwrap();
        assert!(xml.contains("<w:pStyle w:val=\"BodyText\"/>"));
    }

    #[test]
    fn test_core_properties() {
        let mut writer = DocxWriter::new();
        writer.set_title("Review");
        writer.set_author("Reviewer");
        writer.set_modified("2024-01-01T00:00:00Z");

        let bytes = writer
            .generate_with_template(&Document::new(), Template::builtin())
            .unwrap();

        let core = extract_file(&bytes, CORE_PROPERTIES_PATH).unwrap();
        assert!(core.contains("<dc:title>Review</dc:title>"));
        assert!(core.contains("<dc:creator>Reviewer</dc:creator>"));
        assert!(core.contains(
            "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">2024-01-01T00:00:00Z</dcterms:modified>"
        ));
        let package_rels = extract_file(&bytes, PACKAGE_RELS_PATH).unwrap();
        assert!(package_rels.contains(Relationships::TYPE_CORE_PROPERTIES));
        let types = extract_file(&bytes, CONTENT_TYPES_PATH).unwrap();
        assert!(types.contains(content_types::CORE_PROPERTIES));
    }
}
