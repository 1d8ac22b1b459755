//! Review Payload Tests
//!
//! End-to-end tests from JSON payloads to assembled documents.

use redline_ast::{original_text, Attribution, BlockKind, FieldEntry, Inline};
use redline_core::{assemble, AnnotationMode, AssembleOptions};

fn options(mode: AnnotationMode) -> AssembleOptions {
    AssembleOptions {
        mode,
        attribution: Attribution::new("Reviewer", "R", "2024-05-01T12:00:00Z"),
        ..Default::default()
    }
}

fn sample_payload() -> Vec<FieldEntry> {
    let json = r#"[
        {
            "field_name": "sample_content",
            "content": "<p>This is a test paragraph with some <strong>bold text</strong>.</p><p>This is another paragraph.</p>",
            "content_type": "html",
            "comments": [
                {
                    "start_index": 10,
                    "end_index": 14,
                    "comment_content": "Consider using 'example' instead of 'test'",
                    "commented_text": "test",
                    "id": "1"
                },
                {
                    "start_index": 8,
                    "end_index": 15,
                    "comment_content": "different",
                    "id": 2
                }
            ]
        },
        {
            "field_name": "list_content",
            "content": "<ul><li>First item</li><li>Second item</li></ul>",
            "content_type": "HTML",
            "comments": [
                { "start_index": 0, "end_index": 5, "comment_content": "Initial", "id": "3" }
            ]
        },
        {
            "field_name": "plain_text",
            "content": "Plain text content here",
            "content_type": "text",
            "comments": [
                { "start_index": 6, "end_index": 10, "comment_content": "words" }
            ]
        }
    ]"#;
    serde_json::from_str(json).unwrap()
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_payload_layout() {
    let (doc, _) = assemble(&sample_payload(), options(AnnotationMode::TrackChanges));

    let kinds: Vec<BlockKind> = doc.blocks.iter().map(|b| b.kind).collect();
    let bullet = BlockKind::ListItem {
        ordered: false,
        level: 0,
    };
    assert_eq!(
        kinds,
        vec![
            BlockKind::Heading(1),
            BlockKind::Paragraph,
            BlockKind::Paragraph,
            BlockKind::Paragraph,
            BlockKind::Heading(1),
            bullet,
            bullet,
            BlockKind::Paragraph,
            BlockKind::Heading(1),
            BlockKind::Paragraph,
            BlockKind::Paragraph,
        ]
    );
    assert_eq!(doc.blocks[0].original_text(), "Sample Content");
    assert_eq!(doc.blocks[4].original_text(), "List Content");
    assert_eq!(doc.blocks[8].original_text(), "Plain Text");
}

// =============================================================================
// Track changes
// =============================================================================

#[test]
fn test_track_changes_payload() {
    let (doc, report) = assemble(&sample_payload(), options(AnnotationMode::TrackChanges));

    assert_eq!(report.applied, 4);
    assert_eq!(report.skipped, 0);
    assert!(doc.comments.is_empty());

    // First annotation replaces "test" in the first paragraph
    let first = &doc.blocks[1];
    let deleted: Vec<String> = first
        .content
        .iter()
        .filter_map(|i| match i {
            Inline::Deletion { runs, .. } => Some(runs.iter().map(|r| r.text.as_str()).collect()),
            _ => None,
        })
        .collect();
    assert_eq!(deleted, vec!["test"]);

    // Second annotation overlaps it, so it moves on to the next paragraph
    let second = &doc.blocks[2];
    assert_eq!(original_text(&second.content), "This is another paragraph.");
    assert!(second
        .content
        .iter()
        .any(|i| matches!(i, Inline::Deletion { runs, .. } if runs[0].text == "another")));

    // Revision IDs are unique across the document
    let mut ids: Vec<u32> = doc
        .blocks
        .iter()
        .flat_map(|b| b.content.iter())
        .filter_map(|i| match i {
            Inline::Deletion { revision, .. } | Inline::Insertion { revision, .. } => {
                Some(revision.id)
            }
            _ => None,
        })
        .collect();
    let total = ids.len();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(ids.first(), Some(&1));
}

#[test]
fn test_bold_run_split_keeps_style() {
    let json = r#"[{
        "field_name": "",
        "content": "<p>Some <b>bold words</b> here</p>",
        "content_type": "html",
        "comments": [{ "start_index": 10, "end_index": 15, "comment_content": "terms" }]
    }]"#;
    let entries: Vec<FieldEntry> = serde_json::from_str(json).unwrap();
    let (doc, _) = assemble(&entries, options(AnnotationMode::TrackChanges));

    let block = &doc.blocks[0];
    match &block.content[1] {
        Inline::Run(run) => {
            assert_eq!(run.text, "bold ");
            assert!(run.style.bold);
        }
        other => panic!("Expected run, got {:?}", other),
    }
    match &block.content[3] {
        Inline::Insertion { runs, .. } => {
            assert_eq!(runs[0].text, "terms");
            assert!(runs[0].style.bold);
        }
        other => panic!("Expected insertion, got {:?}", other),
    }
    assert_eq!(block.original_text(), "Some bold words here");
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn test_comments_payload() {
    let (doc, report) = assemble(&sample_payload(), options(AnnotationMode::Comments));

    assert_eq!(report.applied, 4);
    assert_eq!(doc.comments.len(), 4);
    assert_eq!(
        doc.comments[0].text,
        "Consider using 'example' instead of 'test'"
    );
    assert_eq!(doc.comments[0].date, "2024-05-01T12:00:00Z");

    // Every comment has a matching range in the body
    for comment in &doc.comments {
        let anchored = doc.blocks.iter().any(|b| {
            b.content
                .iter()
                .any(|i| *i == Inline::CommentReference(comment.id))
        });
        assert!(anchored, "comment {} has no reference", comment.id);
    }
}

#[test]
fn test_comment_mode_keeps_text() {
    let (doc, _) = assemble(&sample_payload(), options(AnnotationMode::Comments));
    assert_eq!(
        doc.blocks[1].original_text(),
        "This is a test paragraph with some bold text."
    );
    assert_eq!(doc.blocks[9].original_text(), "Plain text content here");
}
