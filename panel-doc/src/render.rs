//! Document reconstruction: chapter tree → Markdown string.

use crate::blocks::join_chunks;
use crate::model::{Chapter, Element};

/// Render a chapter back to Markdown.
///
/// The H1 comes first when present, then elements in source order. Generic
/// content emits its preserved blocks; panels emit their H2 followed by each
/// section's improved markdown when present, its original markdown
/// otherwise. Synthetic Initial Content sections carry no heading of their
/// own. Empty chunks are dropped.
///
/// Pure: borrows the tree without mutation, and repeated renders of the same
/// tree produce identical output. An empty chapter renders as `""`.
pub fn render_chapter(chapter: &Chapter) -> String {
    let mut chunks: Vec<&str> = Vec::new();

    if let Some(heading) = &chapter.heading {
        chunks.push(&heading.markdown);
    }

    for element in &chapter.elements {
        match element {
            Element::Generic(generic) => {
                for block in &generic.blocks {
                    chunks.push(&block.markdown);
                }
            }
            Element::Panel(panel) => {
                chunks.push(&panel.heading.markdown);
                for section in &panel.sections {
                    let markdown = section
                        .improved_markdown
                        .as_deref()
                        .unwrap_or(&section.original_markdown);
                    chunks.push(markdown);
                }
            }
        }
    }

    let rendered = join_chunks(chunks);
    if rendered.is_empty() {
        rendered
    } else {
        format!("{rendered}\n")
    }
}
