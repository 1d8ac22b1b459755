//! Annotation rendering
//!
//! An annotation replaces the runs covering its range with review markup.
//! Two strategies exist: tracked changes (a deletion followed by an
//! insertion of the replacement text) and margin comments.

use redline_ast::{Annotation, Attribution, Comment, HighlightColor, Inline, Revision, Run};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::locate::{locate, split};

/// How annotations are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationMode {
    /// Deletion plus insertion revisions
    #[default]
    TrackChanges,
    /// Commented ranges with margin comments
    Comments,
}

impl AnnotationMode {
    /// Human-readable name, as used in progress messages
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationMode::TrackChanges => "track changes",
            AnnotationMode::Comments => "comments",
        }
    }
}

/// Strategy that turns covered runs into review markup
pub trait AnnotationRenderer {
    /// Render the runs covered by `annotation`
    fn render(&mut self, runs: Vec<Run>, annotation: &Annotation) -> Vec<Inline>;

    /// Drain the margin comments recorded so far
    fn take_comments(&mut self) -> Vec<Comment> {
        Vec::new()
    }
}

/// Renders annotations as tracked deletions and insertions
#[derive(Debug, Clone)]
pub struct TrackChangeRenderer {
    attribution: Attribution,
    next_id: u32,
}

impl TrackChangeRenderer {
    /// Create a renderer; revision IDs start at 1
    pub fn new(attribution: Attribution) -> Self {
        Self {
            attribution,
            next_id: 1,
        }
    }

    fn revision(&mut self) -> Revision {
        let id = self.next_id;
        self.next_id += 1;
        Revision {
            id,
            author: self.attribution.author.clone(),
            date: self.attribution.date.clone(),
        }
    }
}

impl AnnotationRenderer for TrackChangeRenderer {
    fn render(&mut self, runs: Vec<Run>, annotation: &Annotation) -> Vec<Inline> {
        let style = runs.first().map(|r| r.style.clone()).unwrap_or_default();

        let mut out = vec![Inline::Deletion {
            revision: self.revision(),
            runs,
        }];

        if !annotation.comment_content.is_empty() {
            out.push(Inline::Insertion {
                revision: self.revision(),
                runs: vec![Run::styled(annotation.comment_content.clone(), style)],
            });
        }
        out
    }
}

/// Renders annotations as margin comments on the covered text
#[derive(Debug, Clone)]
pub struct CommentRenderer {
    attribution: Attribution,
    highlight: Option<HighlightColor>,
    next_id: u32,
    comments: Vec<Comment>,
}

impl CommentRenderer {
    /// Create a renderer; comment IDs start at 0
    pub fn new(attribution: Attribution) -> Self {
        Self {
            attribution,
            highlight: None,
            next_id: 0,
            comments: Vec::new(),
        }
    }

    /// Highlight commented text with a Word highlight colour
    pub fn with_highlight(mut self, colour: Option<HighlightColor>) -> Self {
        self.highlight = colour;
        self
    }
}

impl AnnotationRenderer for CommentRenderer {
    fn render(&mut self, runs: Vec<Run>, annotation: &Annotation) -> Vec<Inline> {
        let id = self.next_id;
        self.next_id += 1;

        self.comments.push(Comment {
            id,
            author: self.attribution.author.clone(),
            initials: self.attribution.initials.clone(),
            date: self.attribution.date.clone(),
            text: annotation.comment_content.clone(),
        });

        let mut out = Vec::with_capacity(runs.len() + 3);
        out.push(Inline::CommentRangeStart(id));
        for mut run in runs {
            if let Some(colour) = self.highlight {
                run.style.highlight = Some(colour);
            }
            out.push(Inline::Run(run));
        }
        out.push(Inline::CommentRangeEnd(id));
        out.push(Inline::CommentReference(id));
        out
    }

    fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }
}

/// Build the renderer for `mode`
pub fn renderer_for(
    mode: AnnotationMode,
    attribution: Attribution,
    highlight: Option<HighlightColor>,
) -> Box<dyn AnnotationRenderer> {
    match mode {
        AnnotationMode::TrackChanges => Box::new(TrackChangeRenderer::new(attribution)),
        AnnotationMode::Comments => {
            Box::new(CommentRenderer::new(attribution).with_highlight(highlight))
        }
    }
}

/// Apply `annotation` to a paragraph's content in place
///
/// The content is left untouched when the range cannot be placed.
pub fn annotate(
    content: &mut Vec<Inline>,
    annotation: &Annotation,
    renderer: &mut dyn AnnotationRenderer,
) -> Result<()> {
    let located = locate(content, annotation.start_index, annotation.end_index)?;
    let range = split(content, located);

    let runs: Vec<Run> = content
        .drain(range.clone())
        .filter_map(|inline| match inline {
            Inline::Run(run) => Some(run),
            _ => None,
        })
        .collect();

    debug!("Applying {} over {} run(s)", annotation, runs.len());

    let rendered = renderer.render(runs, annotation);
    content.splice(range.start..range.start, rendered);
    Ok(())
}
