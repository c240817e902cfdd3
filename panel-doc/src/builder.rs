//! Single-pass chapter construction from block tokens.
//!
//! The builder walks the block sequence once. A leading H1 becomes the
//! chapter title; `"Panel "`-prefixed H2s open panels whose bodies run to
//! the next such H2 or the end of the stream; everything outside a panel
//! accumulates into GenericContent elements. Panel bodies are split into H3
//! sections (with a synthetic Initial Content holder for leading blocks) and
//! H3 bodies into H4 subsections, with 1-based ordinals assigned in source
//! order.
//!
//! A second level-1 heading anywhere is fatal; everything else degrades to
//! content.

use crate::blocks::{join_chunks, Block};
use crate::error::DocumentError;
use crate::model::{
    Chapter, Element, GenericContent, Panel, Section, SectionKind, Subsection,
    INITIAL_CONTENT_TITLE, PANEL_PREFIX, UNTITLED_CHAPTER,
};

/// Build a chapter tree from an ordered block sequence.
pub fn build_chapter(blocks: &[Block], source_file: &str) -> Result<Chapter, DocumentError> {
    let mut title = UNTITLED_CHAPTER.to_string();
    let mut heading = None;
    let mut body = blocks;

    if let Some(first) = blocks.first() {
        if first.is_heading(1) {
            title = first.text.trim().to_string();
            heading = Some(first.clone());
            body = &blocks[1..];
        }
    }

    let mut elements = Vec::new();
    let mut generic: Vec<Block> = Vec::new();
    let mut current: Option<(Block, Vec<Block>)> = None;
    let mut panel_count: u32 = 0;

    for block in body {
        if block.is_heading(1) {
            let message = if heading.is_some() {
                "multiple level-1 headings; a chapter has a single H1 title"
            } else {
                "level-1 heading after other content; the chapter title must come first"
            };
            return Err(DocumentError::Structure {
                file: source_file.to_string(),
                line: block.line,
                message: message.to_string(),
            });
        }

        if is_panel_heading(block) {
            if let Some((panel_heading, panel_body)) = current.take() {
                panel_count += 1;
                elements.push(Element::Panel(build_panel(
                    &panel_heading,
                    &panel_body,
                    panel_count,
                )));
            } else {
                flush_generic(&mut generic, &mut elements);
            }
            current = Some((block.clone(), Vec::new()));
        } else if let Some((_, panel_body)) = current.as_mut() {
            panel_body.push(block.clone());
        } else {
            generic.push(block.clone());
        }
    }

    if let Some((panel_heading, panel_body)) = current.take() {
        panel_count += 1;
        elements.push(Element::Panel(build_panel(
            &panel_heading,
            &panel_body,
            panel_count,
        )));
    }
    flush_generic(&mut generic, &mut elements);

    Ok(Chapter {
        title,
        heading,
        elements,
        source_file: source_file.to_string(),
    })
}

fn is_panel_heading(block: &Block) -> bool {
    block.is_heading(2) && block.text.trim_start().starts_with(PANEL_PREFIX)
}

fn flush_generic(generic: &mut Vec<Block>, elements: &mut Vec<Element>) {
    if generic.is_empty() {
        return;
    }
    let blocks = std::mem::take(generic);
    elements.push(Element::Generic(GenericContent::new(blocks)));
}

fn build_panel(heading: &Block, body: &[Block], number: u32) -> Panel {
    let split = split_at_headings(body, 3);
    let mut sections = Vec::new();
    let mut ordinal: u32 = 0;

    // Leading blocks (and fully empty panels) get the synthetic holder so
    // every panel stays addressable the same way.
    if !split.leading.is_empty() || split.grouped.is_empty() {
        ordinal += 1;
        sections.push(build_section(None, split.leading, ordinal, heading.line));
    }

    for (h3, content) in split.grouped {
        ordinal += 1;
        sections.push(build_section(Some(h3), content, ordinal, h3.line));
    }

    Panel {
        title: heading.text.trim().to_string(),
        heading: heading.clone(),
        number,
        sections,
        line: heading.line,
    }
}

fn build_section(
    heading: Option<&Block>,
    content: &[Block],
    number: u32,
    fallback_line: usize,
) -> Section {
    let split = split_at_headings(content, 4);
    let leading_markdown = join_chunks(split.leading.iter().map(|b| b.markdown.as_str()));

    let mut subsections = Vec::new();
    for (index, (h4, h4_content)) in split.grouped.into_iter().enumerate() {
        subsections.push(Subsection {
            title: h4.text.trim().to_string(),
            heading: h4.clone(),
            content_markdown: join_chunks(h4_content.iter().map(|b| b.markdown.as_str())),
            number: index as u32 + 1,
            line: h4.line,
        });
    }

    let (kind, title, line) = match heading {
        Some(h3) => (SectionKind::Real, h3.text.trim().to_string(), h3.line),
        None => (
            SectionKind::Synthetic,
            INITIAL_CONTENT_TITLE.to_string(),
            fallback_line,
        ),
    };

    let mut section = Section {
        kind,
        title,
        heading: heading.cloned(),
        leading_markdown,
        subsections,
        original_markdown: String::new(),
        improved_markdown: None,
        needs_review: false,
        number,
        line,
    };
    section.rebuild_original_markdown();
    section
}

struct HeadingSplit<'a> {
    leading: &'a [Block],
    grouped: Vec<(&'a Block, &'a [Block])>,
}

/// Partition blocks at headings of the given level: the blocks before the
/// first such heading, then one (heading, body) group per heading.
fn split_at_headings(blocks: &[Block], level: u8) -> HeadingSplit<'_> {
    let mut boundaries: Vec<usize> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| block.is_heading(level))
        .map(|(index, _)| index)
        .collect();

    let leading_end = boundaries.first().copied().unwrap_or(blocks.len());
    boundaries.push(blocks.len());

    let mut grouped = Vec::new();
    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start < blocks.len() {
            grouped.push((&blocks[start], &blocks[start + 1..end]));
        }
    }

    HeadingSplit {
        leading: &blocks[..leading_end],
        grouped,
    }
}
