//! Offset locator
//!
//! Maps a character range over a paragraph's original text onto the runs
//! that hold it, and splits boundary runs so the range covers whole runs.

use std::ops::Range;

use redline_ast::{original_len, Inline, Run};

use crate::error::{AnnotateError, Result};

/// A point inside a paragraph's content where a run may be split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPoint {
    /// Index of the child inline
    pub child: usize,
    /// Byte offset inside that child's text
    pub byte_offset: usize,
}

/// The resolved boundaries of a character range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Where the range starts
    pub start: SplitPoint,
    /// Where the range ends (exclusive)
    pub end: SplitPoint,
}

/// Byte offset of the `chars`-th character in `text`
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Resolve `[start, end)` against `content`
///
/// Fails with [`AnnotateError::InvalidRange`] unless
/// `start < end <= original_len(content)`, and with
/// [`AnnotateError::Overlap`] when any part of the range is already a
/// revision or lies inside a commented range.
pub fn locate(content: &[Inline], start: usize, end: usize) -> Result<Located> {
    let len = original_len(content);
    if start >= end || end > len {
        return Err(AnnotateError::InvalidRange { start, end, len });
    }

    let overlap = AnnotateError::Overlap { start, end };
    let mut cum = 0;
    let mut comment_depth = 0usize;
    let mut start_point = None;

    for (index, inline) in content.iter().enumerate() {
        match inline {
            Inline::CommentRangeStart(_) => comment_depth += 1,
            Inline::CommentRangeEnd(_) => comment_depth = comment_depth.saturating_sub(1),
            _ => {}
        }

        let n = inline.original_len();

        if start_point.is_none() {
            if start < cum + n {
                let Inline::Run(run) = inline else {
                    return Err(overlap);
                };
                if comment_depth > 0 {
                    return Err(overlap);
                }
                start_point = Some(SplitPoint {
                    child: index,
                    byte_offset: byte_index(&run.text, start - cum),
                });
            }
        } else if !matches!(inline, Inline::Run(_)) || comment_depth > 0 {
            // Anything between the boundaries must be untouched text
            return Err(overlap);
        }

        if let Some(start_point) = start_point {
            if end <= cum + n {
                let Inline::Run(run) = inline else {
                    return Err(overlap);
                };
                return Ok(Located {
                    start: start_point,
                    end: SplitPoint {
                        child: index,
                        byte_offset: byte_index(&run.text, end - cum),
                    },
                });
            }
        }

        cum += n;
    }

    Err(AnnotateError::InvalidRange { start, end, len })
}

/// Split boundary runs so `located` covers whole runs
///
/// Returns the index range of the covered runs in the updated content.
/// Each side of a split keeps the original run's style, and no empty runs
/// are created.
pub fn split(content: &mut Vec<Inline>, located: Located) -> Range<usize> {
    let Located { start, end } = located;
    let mut first = start.child;
    let mut last = end.child;

    // End first, so the start index stays valid
    if let Some(Inline::Run(run)) = content.get_mut(end.child) {
        if end.byte_offset > 0 && end.byte_offset < run.text.len() {
            let tail = split_run(run, end.byte_offset);
            content.insert(end.child + 1, Inline::Run(tail));
        }
    }

    if let Some(Inline::Run(run)) = content.get_mut(start.child) {
        if start.byte_offset > 0 && start.byte_offset < run.text.len() {
            let tail = split_run(run, start.byte_offset);
            content.insert(start.child + 1, Inline::Run(tail));
            first += 1;
            last += 1;
        }
    }

    first..last + 1
}

/// Truncate `run` at `at` and return the remainder as a new run
fn split_run(run: &mut Run, at: usize) -> Run {
    let tail = run.text.split_off(at);
    Run::styled(tail, run.style.clone())
}
