//! Typed chapter tree: Chapter → (GenericContent | Panel) → Section → Subsection.
//!
//! The tree is a strict parent→child ownership hierarchy with no
//! back-references. Each node keeps the 1-based source line of its heading
//! and a locally unique ordinal within its parent, which is what downstream
//! enrichment uses as a stable address.

use crate::blocks::{join_chunks, Block, BlockKind};
use serde::Serialize;

/// Literal prefix that marks a level-2 heading as a panel.
pub const PANEL_PREFIX: &str = "Panel ";

/// Title of the synthetic section holding content that appears under a
/// panel's H2 before any H3.
pub const INITIAL_CONTENT_TITLE: &str = "Initial Content";

/// Fallback chapter title when the source has no H1.
pub const UNTITLED_CHAPTER: &str = "Untitled Chapter";

/// Root of one parsed chapter document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chapter {
    pub title: String,
    /// The H1 block, if the source had one.
    pub heading: Option<Block>,
    /// Top-level elements in source order.
    pub elements: Vec<Element>,
    pub source_file: String,
}

impl Chapter {
    /// Panels in source order.
    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.elements.iter().filter_map(|element| match element {
            Element::Panel(panel) => Some(panel),
            Element::Generic(_) => None,
        })
    }

    pub fn panels_mut(&mut self) -> impl Iterator<Item = &mut Panel> {
        self.elements.iter_mut().filter_map(|element| match element {
            Element::Panel(panel) => Some(panel),
            Element::Generic(_) => None,
        })
    }

    /// Look up a panel by its 1-based document ordinal.
    pub fn panel(&self, number: u32) -> Option<&Panel> {
        self.panels().find(|panel| panel.number == number)
    }

    pub fn panel_mut(&mut self, number: u32) -> Option<&mut Panel> {
        self.panels_mut().find(|panel| panel.number == number)
    }
}

/// A top-level chapter element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Generic(GenericContent),
    Panel(Panel),
}

/// Blocks outside any panel, preserved verbatim for the round-trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericContent {
    pub blocks: Vec<Block>,
    /// Heading text of the first block, when that block is a heading.
    pub title: Option<String>,
    pub line: usize,
}

impl GenericContent {
    pub fn new(blocks: Vec<Block>) -> GenericContent {
        let title = blocks.first().and_then(|block| {
            if block.kind == BlockKind::Heading {
                Some(block.text.trim().to_string())
            } else {
                None
            }
        });
        let line = blocks.first().map(|block| block.line).unwrap_or(0);
        GenericContent {
            blocks,
            title,
            line,
        }
    }
}

/// An H2 section whose heading begins with `"Panel "`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    /// Heading text; always begins with `"Panel "`.
    pub title: String,
    pub heading: Block,
    /// 1-based ordinal, unique within the chapter.
    pub number: u32,
    pub sections: Vec<Section>,
    pub line: usize,
}

impl Panel {
    /// First section whose trimmed title matches, synthetic ones included.
    pub fn section_by_title(&self, title: &str) -> Option<&Section> {
        let title = title.trim();
        self.sections
            .iter()
            .find(|section| section.title.trim() == title)
    }

    pub fn section_by_title_mut(&mut self, title: &str) -> Option<&mut Section> {
        let title = title.trim();
        self.sections
            .iter_mut()
            .find(|section| section.title.trim() == title)
    }
}

/// Distinguishes real H3 sections from the synthetic Initial Content holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Real,
    Synthetic,
}

/// An H3 section inside a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    /// The H3 block; `None` iff the section is synthetic. The renderer must
    /// not emit a heading line for a synthetic section.
    pub heading: Option<Block>,
    /// Markdown between the H3 and its first H4.
    pub leading_markdown: String,
    pub subsections: Vec<Subsection>,
    /// Heading + leading content + all subsections, as parsed from source.
    /// Must be regenerated after any mutation of those parts.
    pub original_markdown: String,
    /// Replacement supplied by external enrichment; the renderer prefers it
    /// when present.
    pub improved_markdown: Option<String>,
    pub needs_review: bool,
    /// 1-based ordinal within the panel.
    pub number: u32,
    pub line: usize,
}

impl Section {
    pub fn is_synthetic(&self) -> bool {
        self.kind == SectionKind::Synthetic
    }

    /// Reassemble `original_markdown` from the heading, leading content and
    /// subsections.
    pub fn rebuild_original_markdown(&mut self) {
        let mut chunks: Vec<&str> = Vec::new();
        if let Some(heading) = &self.heading {
            chunks.push(&heading.markdown);
        }
        chunks.push(&self.leading_markdown);
        for subsection in &self.subsections {
            chunks.push(&subsection.heading.markdown);
            chunks.push(&subsection.content_markdown);
        }
        let rebuilt = join_chunks(chunks);
        self.original_markdown = rebuilt;
    }
}

/// An H4 sub-sub-section inside an H3 section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subsection {
    pub title: String,
    pub heading: Block,
    /// Everything until the next H4 or the end of the section.
    pub content_markdown: String,
    /// 1-based ordinal within the section.
    pub number: u32,
    pub line: usize,
}
