//! HTML block parser
//!
//! Turns a content string into an ordered list of paragraph-like blocks:
//! headings, paragraphs and list items. Inline formatting survives as
//! separate runs; everything else about the markup is discarded.
//!
//! Block text is exactly the concatenation of the descendant text nodes, so
//! character offsets computed by the caller against the rendered text line
//! up with the runs produced here.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use redline_ast::{Block, BlockKind, Run, RunStyle};

/// Parse an HTML fragment or document into blocks
///
/// # Example
///
/// ```
/// use redline_ast::BlockKind;
/// use redline_core::html::parse_blocks;
///
/// let blocks = parse_blocks("<h2>Title</h2><p>Some <b>bold</b> text</p>");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0].kind, BlockKind::Heading(2));
/// assert_eq!(blocks[1].original_text(), "Some bold text");
/// ```
pub fn parse_blocks(html: &str) -> Vec<Block> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let dom = parse_html(html);
    let mut roots = Vec::new();
    if !find_body(&dom.document, &mut roots) {
        roots = dom.document.children.borrow().iter().cloned().collect();
    }

    let mut builder = BlockBuilder::default();
    for node in &roots {
        builder.walk(node);
    }
    builder.finish()
}

fn parse_html(input: &str) -> RcDom {
    let wrapped = if input.to_ascii_lowercase().contains("<html") {
        input.to_string()
    } else {
        format!(
            "<!doctype html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            input
        )
    };
    parse_document(RcDom::default(), Default::default()).one(wrapped)
}

fn find_body(node: &Handle, out: &mut Vec<Handle>) -> bool {
    if tag_name(node).as_deref() == Some("body") {
        out.extend(node.children.borrow().iter().cloned());
        return true;
    }
    for child in node.children.borrow().iter() {
        if find_body(child, out) {
            return true;
        }
    }
    false
}

fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Append text to a run list, merging with the last run when styles match
fn push_text(runs: &mut Vec<Run>, text: &str, style: &RunStyle) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.style == *style => last.text.push_str(text),
        _ => runs.push(Run::styled(text, style.clone())),
    }
}

fn has_visible_text(runs: &[Run]) -> bool {
    runs.iter().any(|r| !r.text.trim().is_empty())
}

/// Strip whitespace at both edges of an implicit paragraph
///
/// Loose text picks up the inter-element whitespace around it.
fn trim_runs(mut runs: Vec<Run>) -> Vec<Run> {
    while let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
        if !first.text.is_empty() {
            break;
        }
        runs.remove(0);
    }
    while let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
        if !last.text.is_empty() {
            break;
        }
        runs.pop();
    }
    runs
}

/// A block whose end tag has not been reached yet
struct OpenBlock {
    kind: BlockKind,
    runs: Vec<Run>,
    /// Blocks nested inside this one (list items of a sub-list), emitted after it
    nested: Vec<Block>,
}

#[derive(Default)]
struct FormatDepth {
    bold: u32,
    italic: u32,
    underline: u32,
    monospace: u32,
}

impl FormatDepth {
    fn style(&self) -> RunStyle {
        RunStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            monospace: self.monospace > 0,
            highlight: None,
        }
    }

    fn counter(&mut self, tag: &str) -> Option<&mut u32> {
        match tag {
            "b" | "strong" => Some(&mut self.bold),
            "i" | "em" => Some(&mut self.italic),
            "u" | "ins" => Some(&mut self.underline),
            "code" | "kbd" | "samp" | "tt" => Some(&mut self.monospace),
            _ => None,
        }
    }
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    open: Vec<OpenBlock>,
    /// Text found outside any block
    loose: Vec<Run>,
    /// Enclosing lists, innermost last; `true` for `ol`
    lists: Vec<bool>,
    format: FormatDepth,
}

impl BlockBuilder {
    fn walk(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                let style = self.format.style();
                match self.open.last_mut() {
                    Some(block) => push_text(&mut block.runs, &text, &style),
                    None => push_text(&mut self.loose, &text, &style),
                }
            }
            NodeData::Element { .. } => {
                let Some(tag) = tag_name(node) else { return };
                self.element(node, &tag);
            }
            _ => {}
        }
    }

    fn walk_children(&mut self, node: &Handle) {
        for child in node.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn element(&mut self, node: &Handle, tag: &str) {
        match tag {
            "script" | "style" | "head" | "template" | "noscript" => {}
            "ul" | "ol" => {
                self.lists.push(tag == "ol");
                self.walk_children(node);
                self.lists.pop();
            }
            "li" => {
                let kind = BlockKind::ListItem {
                    ordered: self.lists.last().copied().unwrap_or(false),
                    level: self.lists.len().saturating_sub(1).min(8) as u8,
                };
                self.open_block(kind);
                self.walk_children(node);
                self.close_block();
            }
            _ => {
                let kind = match heading_level(tag) {
                    Some(level) => Some(BlockKind::Heading(level)),
                    None if tag == "p" => Some(BlockKind::Paragraph),
                    None => None,
                };

                // Block tags nested inside an open block only contribute text
                if let (Some(kind), true) = (kind, self.open.is_empty()) {
                    self.open_block(kind);
                    self.walk_children(node);
                    self.close_block();
                    return;
                }

                if let Some(depth) = self.format.counter(tag) {
                    *depth += 1;
                    self.walk_children(node);
                    if let Some(depth) = self.format.counter(tag) {
                        *depth = depth.saturating_sub(1);
                    }
                } else {
                    self.walk_children(node);
                }
            }
        }
    }

    fn open_block(&mut self, kind: BlockKind) {
        if self.open.is_empty() {
            self.flush_loose();
        }
        self.open.push(OpenBlock {
            kind,
            runs: Vec::new(),
            nested: Vec::new(),
        });
    }

    fn close_block(&mut self) {
        let Some(block) = self.open.pop() else { return };

        let mut finished = Vec::with_capacity(1 + block.nested.len());
        if has_visible_text(&block.runs) {
            finished.push(Block::from_runs(block.kind, block.runs));
        }
        finished.extend(block.nested);

        match self.open.last_mut() {
            Some(parent) => parent.nested.extend(finished),
            None => self.blocks.extend(finished),
        }
    }

    fn flush_loose(&mut self) {
        let runs = std::mem::take(&mut self.loose);
        if has_visible_text(&runs) {
            let runs = trim_runs(runs);
            self.blocks.push(Block::from_runs(BlockKind::Paragraph, runs));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        while !self.open.is_empty() {
            self.close_block();
        }
        self.flush_loose();
        self.blocks
    }
}
