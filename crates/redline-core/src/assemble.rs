//! Document assembly
//!
//! Builds a [`Document`] from the review payload: one section per field
//! entry, with the entry's annotations applied to the paragraphs that hold
//! them.

use redline_ast::{
    Annotation, Attribution, Block, ContentType, Document, FieldEntry, HighlightColor,
};
use tracing::{debug, warn};

use crate::annotate::{annotate, renderer_for, AnnotationMode, AnnotationRenderer};
use crate::html::parse_blocks;
use crate::text::{char_slice, field_title, find_char_index};

/// Default author stamped on revisions and comments
pub const DEFAULT_AUTHOR: &str = "Reviewer";
/// Default comment initials
pub const DEFAULT_INITIALS: &str = "R";

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`
pub fn default_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Options controlling assembly
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Track changes or comments
    pub mode: AnnotationMode,
    /// Who the revisions and comments are attributed to
    pub attribution: Attribution,
    /// Emit a heading for each non-empty field name
    pub field_headings: bool,
    /// Level of field headings (1-9)
    pub heading_level: u8,
    /// Emit an empty paragraph after each entry
    pub section_spacing: bool,
    /// Fall back to searching for `commented_text` when offsets do not fit
    pub relocate_by_text: bool,
    /// Highlight colour for commented text
    pub highlight: Option<HighlightColor>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            mode: AnnotationMode::default(),
            attribution: Attribution::new(DEFAULT_AUTHOR, DEFAULT_INITIALS, default_timestamp()),
            field_headings: true,
            heading_level: 1,
            section_spacing: true,
            relocate_by_text: false,
            highlight: None,
        }
    }
}

/// Outcome counters for an assembly run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleReport {
    /// Annotations rendered into the document
    pub applied: usize,
    /// Annotations that could not be placed
    pub skipped: usize,
    /// Applied annotations placed by searching for their text
    pub relocated: usize,
}

/// Incremental document builder
pub struct Assembler {
    options: AssembleOptions,
    renderer: Box<dyn AnnotationRenderer>,
    document: Document,
    report: AssembleReport,
}

impl Assembler {
    /// Create an assembler
    pub fn new(options: AssembleOptions) -> Self {
        let renderer = renderer_for(
            options.mode,
            options.attribution.clone(),
            options.highlight,
        );
        Self {
            options,
            renderer,
            document: Document::new(),
            report: AssembleReport::default(),
        }
    }

    /// Append one field entry
    pub fn push_entry(&mut self, entry: &FieldEntry) {
        if self.options.field_headings && !entry.field_name.is_empty() {
            let level = self.options.heading_level.clamp(1, 9);
            self.document
                .push(Block::heading(level, field_title(&entry.field_name)));
        }

        let mut blocks = match entry.content_type {
            ContentType::Html => parse_blocks(&entry.content),
            ContentType::Text => vec![Block::paragraph(entry.content.as_str())],
        };
        debug!(
            "Field '{}': {} block(s), {} annotation(s)",
            entry.field_name,
            blocks.len(),
            entry.comments.len()
        );

        for annotation in &entry.comments {
            self.place(&mut blocks, annotation);
        }

        for block in blocks {
            self.document.push(block);
        }

        if self.options.section_spacing {
            self.document.push(Block::paragraph(""));
        }
    }

    /// Apply `annotation` to the first block that can hold it
    fn place(&mut self, blocks: &mut [Block], annotation: &Annotation) {
        let mut last_error = None;

        for block in blocks.iter_mut() {
            match annotate(&mut block.content, annotation, self.renderer.as_mut()) {
                Ok(()) => {
                    self.report.applied += 1;
                    check_commented_text(block, annotation);
                    return;
                }
                Err(err) => last_error = Some(err),
            }
        }

        if self.options.relocate_by_text && self.relocate(blocks, annotation) {
            return;
        }

        self.report.skipped += 1;
        match last_error {
            Some(err) => warn!("Skipping {}: {}", annotation, err),
            None => warn!("Skipping {}: no paragraph to annotate", annotation),
        }
    }

    /// Apply `annotation` at the first occurrence of its `commented_text`
    fn relocate(&mut self, blocks: &mut [Block], annotation: &Annotation) -> bool {
        let Some(needle) = annotation.commented_text.as_deref() else {
            return false;
        };
        let width = needle.chars().count();

        for block in blocks.iter_mut() {
            let Some(start) = find_char_index(&block.original_text(), needle) else {
                continue;
            };
            let mut moved = annotation.clone();
            moved.start_index = start;
            moved.end_index = start + width;

            match annotate(&mut block.content, &moved, self.renderer.as_mut()) {
                Ok(()) => {
                    debug!("Relocated {} to [{}, {})", annotation, start, start + width);
                    self.report.applied += 1;
                    self.report.relocated += 1;
                    return true;
                }
                Err(err) => debug!("Cannot relocate {} here: {}", annotation, err),
            }
        }
        false
    }

    /// Finish assembly, collecting any margin comments
    pub fn finish(mut self) -> (Document, AssembleReport) {
        self.document.comments = self.renderer.take_comments();
        (self.document, self.report)
    }
}

fn check_commented_text(block: &Block, annotation: &Annotation) {
    let Some(expected) = annotation.commented_text.as_deref() else {
        return;
    };
    let actual = char_slice(
        &block.original_text(),
        annotation.start_index,
        annotation.end_index,
    );
    if expected.trim() != actual.trim() {
        warn!(
            "Text at {} is '{}', expected '{}'",
            annotation, actual, expected
        );
    }
}

/// Assemble a document from field entries
///
/// # Example
///
/// ```
/// use redline_ast::{Annotation, FieldEntry};
/// use redline_core::{assemble, AssembleOptions};
///
/// let entry = FieldEntry {
///     field_name: "summary".to_string(),
///     content: "Hello world".to_string(),
///     comments: vec![Annotation::new(6, 11, "there")],
///     ..Default::default()
/// };
/// let (doc, report) = assemble(&[entry], AssembleOptions::default());
///
/// assert_eq!(report.applied, 1);
/// assert_eq!(doc.blocks[0].original_text(), "Summary");
/// ```
pub fn assemble(entries: &[FieldEntry], options: AssembleOptions) -> (Document, AssembleReport) {
    let mut assembler = Assembler::new(options);
    for entry in entries {
        assembler.push_entry(entry);
    }
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_ast::{BlockKind, Inline};

    fn options(mode: AnnotationMode) -> AssembleOptions {
        AssembleOptions {
            mode,
            attribution: Attribution::new("Reviewer", "R", "2024-01-01T00:00:00Z"),
            ..Default::default()
        }
    }

    fn entry(name: &str, content: &str, html: bool, comments: Vec<Annotation>) -> FieldEntry {
        FieldEntry {
            field_name: name.to_string(),
            content: content.to_string(),
            content_type: if html {
                ContentType::Html
            } else {
                ContentType::Text
            },
            comments,
        }
    }

    fn count_deletions(block: &Block) -> usize {
        block
            .content
            .iter()
            .filter(|i| matches!(i, Inline::Deletion { .. }))
            .count()
    }

    #[test]
    fn test_plain_entry_layout() {
        let entries = vec![entry("sample_field", "Some text", false, vec![])];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.blocks[0].kind, BlockKind::Heading(1));
        assert_eq!(doc.blocks[0].original_text(), "Sample Field");
        assert_eq!(doc.blocks[1].original_text(), "Some text");
        assert!(doc.blocks[2].is_empty());
        assert_eq!(report, AssembleReport::default());
    }

    #[test]
    fn test_empty_field_name_has_no_heading() {
        let entries = vec![entry("", "Body", false, vec![])];
        let (doc, _) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_layout_options() {
        let entries = vec![entry("field", "Body", false, vec![])];
        let opts = AssembleOptions {
            heading_level: 2,
            section_spacing: false,
            ..options(AnnotationMode::TrackChanges)
        };
        let (doc, _) = assemble(&entries, opts);
        assert_eq!(doc.blocks[0].kind, BlockKind::Heading(2));
        assert_eq!(doc.len(), 2);

        let opts = AssembleOptions {
            field_headings: false,
            ..options(AnnotationMode::TrackChanges)
        };
        let (doc, _) = assemble(&entries, opts);
        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_plain_entry_applies_every_annotation() {
        let entries = vec![entry(
            "",
            "one two three",
            false,
            vec![Annotation::new(0, 3, "1"), Annotation::new(8, 13, "3")],
        )];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(report.applied, 2);
        assert_eq!(count_deletions(&doc.blocks[0]), 2);
    }

    #[test]
    fn test_html_annotation_goes_to_first_fitting_block() {
        let html = "<p>Short</p><p>A considerably longer paragraph</p>";
        let entries = vec![entry(
            "content",
            html,
            true,
            vec![Annotation::new(2, 20, "replacement")],
        )];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(report.applied, 1);
        assert_eq!(count_deletions(&doc.blocks[1]), 0);
        assert_eq!(count_deletions(&doc.blocks[2]), 1);
    }

    #[test]
    fn test_html_annotations_are_consumed() {
        let html = "<p>Hello world</p><p>Hello again</p>";
        let entries = vec![entry(
            "",
            html,
            true,
            vec![Annotation::new(0, 5, "Hi"), Annotation::new(0, 5, "Hey")],
        )];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        // The second annotation overlaps the first in block 0, so it lands in block 1
        assert_eq!(report.applied, 2);
        assert_eq!(count_deletions(&doc.blocks[0]), 1);
        assert_eq!(count_deletions(&doc.blocks[1]), 1);
    }

    #[test]
    fn test_unplaceable_annotation_is_skipped() {
        let entries = vec![entry(
            "",
            "tiny",
            false,
            vec![Annotation::new(2, 50, "x").with_id("a1"), Annotation::new(0, 2, "ok")],
        )];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(doc.blocks[0].original_text(), "tiny");
    }

    #[test]
    fn test_field_heading_never_annotated() {
        let entries = vec![entry(
            "heading_text",
            "<p>ab</p>",
            true,
            vec![Annotation::new(0, 7, "x")],
        )];
        let (doc, report) = assemble(&entries, options(AnnotationMode::TrackChanges));

        assert_eq!(report.skipped, 1);
        assert_eq!(count_deletions(&doc.blocks[0]), 0);
    }

    #[test]
    fn test_relocate_by_text() {
        let annotation = Annotation::new(40, 45, "fixed").with_commented_text("typo");
        let entries = vec![entry("", "<p>One typo here</p>", true, vec![annotation])];

        let (_, report) = assemble(&entries, options(AnnotationMode::TrackChanges));
        assert_eq!(report.skipped, 1);

        let opts = AssembleOptions {
            relocate_by_text: true,
            ..options(AnnotationMode::TrackChanges)
        };
        let (doc, report) = assemble(&entries, opts);
        assert_eq!(report.applied, 1);
        assert_eq!(report.relocated, 1);
        match &doc.blocks[0].content[1] {
            Inline::Deletion { runs, .. } => assert_eq!(runs[0].text, "typo"),
            other => panic!("Expected deletion, got {:?}", other),
        }
    }

    #[test]
    fn test_comments_collected_in_order() {
        let entries = vec![
            entry("a", "first text", false, vec![Annotation::new(0, 5, "c0")]),
            entry("b", "second text", false, vec![Annotation::new(0, 6, "c1")]),
        ];
        let (doc, report) = assemble(&entries, options(AnnotationMode::Comments));

        assert_eq!(report.applied, 2);
        let ids: Vec<u32> = doc.comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(doc.comments[1].text, "c1");
        assert_eq!(doc.comments[0].author, "Reviewer");
    }

    #[test]
    fn test_empty_entries() {
        let (doc, report) = assemble(&[], options(AnnotationMode::Comments));
        assert!(doc.is_empty());
        assert!(doc.comments.is_empty());
        assert_eq!(report.applied, 0);
    }

    #[test]
    fn test_default_timestamp_format() {
        let ts = default_timestamp();
        assert_eq!(ts.len(), 20);
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
    }
}
