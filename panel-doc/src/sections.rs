//! Named section addressing and replacement.
//!
//! The recognized H3 titles form a closed set ([`CanonicalTitle`]);
//! extraction and update address panels through them. Replacement text from
//! the enrichment service arrives with unreliable wrapping (outer code
//! fences, a repeated heading line), so updates run it through a pipeline of
//! small sanitizing transforms before storing it:
//!
//! strip one outer fence → reparse → drop duplicate headings → drop fence
//! residue → re-render → prepend the canonical heading.
//!
//! Each stage is a separate function so it can be tested on its own; the
//! whole pipeline is idempotent.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::blocks::{join_chunks, parse_blocks, Block, BlockKind};
use crate::model::{Panel, SectionKind};

/// The closed set of recognized H3 section titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CanonicalTitle {
    SceneDescription,
    TeachingNarrative,
    CommonExample,
    BestPractice,
    BankingImpact,
    ImplementationGuidance,
}

impl CanonicalTitle {
    pub const ALL: [CanonicalTitle; 6] = [
        CanonicalTitle::SceneDescription,
        CanonicalTitle::TeachingNarrative,
        CanonicalTitle::CommonExample,
        CanonicalTitle::BestPractice,
        CanonicalTitle::BankingImpact,
        CanonicalTitle::ImplementationGuidance,
    ];

    /// The exact heading text for this section.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalTitle::SceneDescription => "Scene Description",
            CanonicalTitle::TeachingNarrative => "Teaching Narrative",
            CanonicalTitle::CommonExample => "Common Example of the Problem",
            CanonicalTitle::BestPractice => "SRE Best Practice: Evidence-Based Investigation",
            CanonicalTitle::BankingImpact => "Banking Impact",
            CanonicalTitle::ImplementationGuidance => "Implementation Guidance",
        }
    }

    /// Match a heading against the canonical set (trimmed, case-sensitive).
    pub fn from_title(title: &str) -> Option<CanonicalTitle> {
        let title = title.trim();
        CanonicalTitle::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == title)
    }
}

impl std::fmt::Display for CanonicalTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collect the Markdown of every canonical section in a panel.
///
/// The key set is always the full canonical set; sections absent from the
/// panel map to the empty string. Headings outside the set are ignored here
/// but stay addressable by ordinal.
pub fn extract_named_sections(panel: &Panel) -> BTreeMap<CanonicalTitle, String> {
    let mut result: BTreeMap<CanonicalTitle, String> = CanonicalTitle::ALL
        .iter()
        .map(|canonical| (*canonical, String::new()))
        .collect();

    for section in &panel.sections {
        if let Some(canonical) = CanonicalTitle::from_title(&section.title) {
            result.insert(canonical, section.original_markdown.clone());
        }
    }

    result
}

/// Replace the content of the first real section whose trimmed title equals
/// `title`.
///
/// Returns false (and logs) when the panel has no such section. Synthetic
/// Initial Content sections are not updatable: a replacement would force a
/// heading line the renderer must not emit for them. Two updates to the same
/// section apply last-writer-wins.
pub fn update_named_section(panel: &mut Panel, title: &str, new_markdown: &str) -> bool {
    let wanted = title.trim();
    let panel_number = panel.number;

    let target = panel
        .sections
        .iter_mut()
        .find(|section| section.kind == SectionKind::Real && section.title.trim() == wanted);

    let Some(section) = target else {
        warn!(
            panel = panel_number,
            title = wanted,
            "update targets a section the panel does not have"
        );
        return false;
    };

    section.improved_markdown = Some(sanitize_replacement(wanted, new_markdown));
    section.needs_review = true;
    true
}

/// Sanitize replacement Markdown before it is stored on a section.
///
/// Idempotent: sanitizing an already-sanitized replacement returns it
/// unchanged.
pub fn sanitize_replacement(title: &str, raw: &str) -> String {
    let title = title.trim();

    let (body, stripped) = strip_outer_fence(raw);
    if stripped {
        debug!(title, "stripped outer code fence from replacement");
    }

    let blocks = parse_blocks(&body);
    let blocks = drop_duplicate_headings(blocks, title);
    let blocks = if stripped {
        drop_fence_residue(blocks)
    } else {
        blocks
    };

    let rendered = join_chunks(blocks.iter().map(|block| block.markdown.as_str()));
    if rendered.is_empty() {
        format!("### {title}")
    } else {
        format!("### {title}\n\n{rendered}")
    }
}

/// Strip a single outer fenced-code wrapper (``` or ```markdown / ```json).
///
/// Only fires when the first line opens a fence with one of those info
/// strings and the last line is a bare closing fence. A replacement that is
/// entirely one real code example (```promql, ```rust, ...) is content, not
/// wrapping, and passes through untouched.
fn strip_outer_fence(raw: &str) -> (String, bool) {
    let trimmed = raw.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < 2 {
        return (trimmed.to_string(), false);
    }

    let opens = matches!(
        lines[0].trim().strip_prefix("```").map(str::trim),
        Some("" | "markdown" | "json")
    );
    let closes = lines[lines.len() - 1].trim() == "```";
    if !(opens && closes) {
        return (trimmed.to_string(), false);
    }

    (lines[1..lines.len() - 1].join("\n").trim().to_string(), true)
}

/// Drop level-3 headings that repeat the section title (trimmed,
/// case-insensitive), so the prepended canonical heading stays the only one.
fn drop_duplicate_headings(mut blocks: Vec<Block>, title: &str) -> Vec<Block> {
    blocks.retain(|block| {
        let duplicate = block.is_heading(3) && block.text.trim().eq_ignore_ascii_case(title);
        if duplicate {
            debug!(title, "dropped duplicate section heading from replacement");
        }
        !duplicate
    });
    blocks
}

/// Drop code blocks with no content once unfenced. These are what an
/// unbalanced outer wrapper degrades into on reparse; real code examples
/// keep their content and survive.
fn drop_fence_residue(mut blocks: Vec<Block>) -> Vec<Block> {
    blocks.retain(|block| {
        if block.kind != BlockKind::CodeBlock {
            return true;
        }
        let empty = block.markdown.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with("```") || line.starts_with("~~~")
        });
        if empty {
            debug!("dropped empty code fence residue from replacement");
        }
        !empty
    });
    blocks
}
