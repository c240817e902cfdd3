//! Import tests (Markdown → chapter tree)
//!
//! These verify that chapter sources build the expected tree: panel and
//! section ordinals, synthetic Initial Content holders, generic content and
//! the structural error paths.

use crate::common::{fixture, load};
use panel_doc::{ChapterDocument, DocumentError, Element, SectionKind};
use proptest::prelude::*;

#[test]
fn empty_input_builds_an_untitled_empty_chapter() {
    let doc = load("");
    let chapter = doc.chapter().unwrap();
    assert_eq!(chapter.title, "Untitled Chapter");
    assert!(chapter.elements.is_empty());
    assert_eq!(doc.render(), "");
}

#[test]
fn minimal_panel_builds_one_section() {
    let doc = load("# Ch\n\n## Panel 1: A\n\n### Scene Description\n\nHello.\n");
    let chapter = doc.chapter().unwrap();
    assert_eq!(chapter.title, "Ch");

    let panel = doc.panel(1).expect("panel 1 should exist");
    assert_eq!(panel.number, 1);
    assert_eq!(panel.title, "Panel 1: A");
    assert_eq!(panel.sections.len(), 1);

    let section = &panel.sections[0];
    assert_eq!(section.title, "Scene Description");
    assert_eq!(section.number, 1);
    assert_eq!(section.kind, SectionKind::Real);
    assert_eq!(
        section.original_markdown,
        "### Scene Description\n\nHello."
    );
}

#[test]
fn two_h1_headings_are_rejected_with_the_second_line() {
    let mut doc = ChapterDocument::new();
    let err = doc.load_str("# A\n\n# B\n", "two-h1.md").unwrap_err();
    match err {
        DocumentError::Structure { file, line, .. } => {
            assert_eq!(file, "two-h1.md");
            assert_eq!(line, 3);
        }
        other => panic!("expected Structure error, got {other:?}"),
    }
}

#[test]
fn leading_panel_content_becomes_a_synthetic_section() {
    let doc = load("## Panel 1: X\n\nLead paragraph.\n\n### Teaching Narrative\n\nBody.\n");
    let panel = doc.panel(1).unwrap();

    let titles: Vec<&str> = panel.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Initial Content", "Teaching Narrative"]);
    assert!(panel.sections[0].is_synthetic());
    assert!(panel.sections[0].heading.is_none());
    assert_eq!(panel.sections[0].original_markdown, "Lead paragraph.");
}

#[test]
fn headings_that_do_not_start_with_panel_are_generic() {
    let doc = load("# Ch\n\n## Prologue\n\nScene setting.\n\n## Panel 1: A\n\n### Banking Impact\n\nMoney.\n");
    let chapter = doc.chapter().unwrap();
    assert_eq!(chapter.panels().count(), 1);
    match &chapter.elements[0] {
        Element::Generic(generic) => {
            assert_eq!(generic.title.as_deref(), Some("Prologue"));
            assert_eq!(generic.blocks.len(), 2);
        }
        other => panic!("expected generic element first, got {other:?}"),
    }
}

#[test]
fn kitchensink_builds_the_expected_tree() {
    let doc = load(&fixture("chapter-kitchensink.md"));
    let chapter = doc.chapter().unwrap();
    assert_eq!(chapter.title, "Chapter 3: The Dashboard Lied");

    let panels = doc.list_panels();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].title, "Panel 1: The Green Wall");
    assert_eq!(panels[1].title, "Panel 2: The Silent Pager");

    // Panel 1: synthetic lead + the six canonical sections.
    let panel = &panels[0];
    assert_eq!(panel.sections.len(), 7);
    assert!(panel.sections[0].is_synthetic());
    let numbers: Vec<u32> = panel.sections.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);

    // Teaching Narrative carries two H4 subsections.
    let narrative = panel.section_by_title("Teaching Narrative").unwrap();
    assert_eq!(narrative.subsections.len(), 2);
    assert_eq!(narrative.subsections[0].title, "The Aggregation Trap");
    assert_eq!(narrative.subsections[1].title, "What To Ask Instead");
    assert!(narrative
        .subsections[1]
        .content_markdown
        .starts_with("> Which signal"));

    // Panel 2 has no leading content, so no synthetic holder.
    let panel = &panels[1];
    assert!(!panel.sections[0].is_synthetic());
    assert_eq!(panel.sections[0].title, "Scene Description");
}

#[test]
fn fenced_code_and_tables_survive_inside_sections() {
    let doc = load(&fixture("chapter-kitchensink.md"));
    let panel = doc.panel(1).unwrap();

    let example = panel
        .section_by_title("Common Example of the Problem")
        .unwrap();
    assert!(example
        .original_markdown
        .contains("```promql\nrate(checkout_errors_total[5m])\n```"));

    let practice = panel
        .section_by_title("SRE Best Practice: Evidence-Based Investigation")
        .unwrap();
    assert!(practice.original_markdown.contains("| Step | Evidence | Tool |"));
}

proptest! {
    #[test]
    fn panel_ordinals_always_count_from_one(count in 0usize..8) {
        let mut source = String::from("# Generated\n");
        for i in 0..count {
            source.push_str(&format!("\n## Panel {}: Scene {}\n\nBody {}.\n", i + 1, i + 1, i + 1));
        }

        let doc = load(&source);
        let numbers: Vec<u32> = doc.list_panels().iter().map(|p| p.number).collect();
        let expected: Vec<u32> = (1..=count as u32).collect();
        prop_assert_eq!(numbers, expected);
    }
}
