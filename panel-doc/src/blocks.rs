//! Block-level Markdown tokenization (comrak adapter)
//!
//! Wraps the `comrak` parser behind a small block-token surface. The rest of
//! the crate never touches the comrak AST: it sees ordered [`Block`]s, each
//! carrying its kind, heading level, inline text, source line and the exact
//! Markdown lines it came from.
//!
//! # Library Choice
//!
//! `comrak` is used for Markdown parsing. Malformed Markdown never fails
//! here: anything comrak cannot classify degrades to a paragraph, which is
//! exactly the forgiving behavior the enrichment pipeline needs when it
//! re-parses model output.
//!
//! # Round-trip
//!
//! Block Markdown is sliced from the source via comrak source positions
//! rather than re-rendered, so joining the blocks back together reproduces
//! the input byte for byte, modulo two documented normalizations: runs of
//! blank lines collapse to one, and trailing whitespace at a block's end is
//! dropped.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use serde::Serialize;

/// Kind of a top-level block token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    Heading,
    Paragraph,
    CodeBlock,
    List,
    Quote,
    Table,
    ThematicBreak,
    Html,
}

/// One top-level block token with its canonical Markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    /// Heading level 1-6; `None` for non-heading blocks.
    pub heading_level: Option<u8>,
    /// Inline text content. Collected for headings; empty otherwise.
    pub text: String,
    /// 1-based line of the block's first source line.
    pub line: usize,
    /// Exact source slice for this block.
    pub markdown: String,
}

impl Block {
    /// Whether this block is a heading at the given level.
    pub fn is_heading(&self, level: u8) -> bool {
        self.kind == BlockKind::Heading && self.heading_level == Some(level)
    }
}

fn default_comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Tokenize a Markdown source into its top-level blocks.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    let lines: Vec<&str> = source.split('\n').collect();
    let mut blocks = Vec::new();

    for child in root.children() {
        let data = child.data.borrow();
        let (kind, heading_level) = classify(&data.value);

        let text = if kind == BlockKind::Heading {
            collect_text(child)
        } else {
            String::new()
        };

        let start = data.sourcepos.start.line;
        let end = data.sourcepos.end.line.min(lines.len());
        let markdown = if start >= 1 && start <= end {
            lines[start - 1..end].join("\n").trim_end().to_string()
        } else {
            String::new()
        };

        blocks.push(Block {
            kind,
            heading_level,
            text,
            line: start,
            markdown,
        });
    }

    blocks
}

fn classify(value: &NodeValue) -> (BlockKind, Option<u8>) {
    match value {
        NodeValue::Heading(heading) => (BlockKind::Heading, Some(heading.level)),
        NodeValue::CodeBlock(_) => (BlockKind::CodeBlock, None),
        NodeValue::List(_) => (BlockKind::List, None),
        NodeValue::BlockQuote => (BlockKind::Quote, None),
        NodeValue::Table(_) => (BlockKind::Table, None),
        NodeValue::ThematicBreak => (BlockKind::ThematicBreak, None),
        NodeValue::HtmlBlock(_) => (BlockKind::Html, None),
        // Everything else (including constructs comrak degraded) reads as a
        // paragraph for structural purposes.
        _ => (BlockKind::Paragraph, None),
    }
}

/// Collect the inline text of a node's children (used for heading titles).
fn collect_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut output = String::new();
    for child in node.children() {
        collect_text_content(child, &mut output);
    }
    output
}

fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}

/// Join block-level Markdown chunks with blank-line separators.
///
/// Empty chunks are dropped, so callers can pass optional pieces through
/// without filtering first. The result carries no trailing newline; the
/// renderer adds the final one for whole documents.
pub fn join_chunks<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for chunk in chunks {
        let chunk = chunk.trim_end();
        if chunk.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(chunk);
    }
    out
}
