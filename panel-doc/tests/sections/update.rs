//! Update tests: targeted replacement of one named section, with the
//! sanitizing pipeline applied to whatever the enrichment service sent back.

use crate::common::{fixture, load};
use panel_doc::sections::sanitize_replacement;
use proptest::prelude::*;

const MINIMAL: &str = "# Ch\n\n## Panel 1: A\n\n### Scene Description\n\nHello.\n";

#[test]
fn plain_replacement_lands_under_the_canonical_heading() {
    let mut doc = load(MINIMAL);
    assert!(doc.update_named_section_in_panel(1, "Scene Description", "New."));
    assert_eq!(
        doc.render(),
        "# Ch\n\n## Panel 1: A\n\n### Scene Description\n\nNew.\n"
    );
}

#[test]
fn fenced_wrapper_and_repeated_heading_are_stripped() {
    let mut doc = load(MINIMAL);
    assert!(doc.update_named_section_in_panel(
        1,
        "Scene Description",
        "```markdown\n### Scene Description\n\nNew.\n```",
    ));
    let rendered = doc.render();
    assert_eq!(rendered, "# Ch\n\n## Panel 1: A\n\n### Scene Description\n\nNew.\n");
    assert_eq!(rendered.matches("### Scene Description").count(), 1);
    assert!(!rendered.contains("```"));
}

#[test]
fn code_examples_inside_the_replacement_survive() {
    let mut doc = load(MINIMAL);
    assert!(doc.update_named_section_in_panel(
        1,
        "Scene Description",
        "Query it directly:\n\n```promql\nup == 0\n```",
    ));
    assert!(doc
        .render()
        .contains("Query it directly:\n\n```promql\nup == 0\n```"));
}

#[test]
fn a_replacement_that_is_entirely_one_code_example_keeps_its_fence() {
    let mut doc = load(MINIMAL);
    assert!(doc.update_named_section_in_panel(
        1,
        "Scene Description",
        "```promql\nrate(x[5m])\n```",
    ));
    assert_eq!(
        doc.render(),
        "# Ch\n\n## Panel 1: A\n\n### Scene Description\n\n```promql\nrate(x[5m])\n```\n"
    );
}

#[test]
fn miss_on_an_absent_section_changes_nothing() {
    let mut doc = load(MINIMAL);
    let before = doc.render();
    assert!(!doc.update_named_section_in_panel(1, "Banking Impact", "New."));
    assert!(!doc.update_named_section_in_panel(1, "No Such Section", "New."));
    assert_eq!(doc.render(), before);
}

#[test]
fn miss_on_an_absent_panel_changes_nothing() {
    let mut doc = load(MINIMAL);
    let before = doc.render();
    assert!(!doc.update_named_section_in_panel(7, "Scene Description", "New."));
    assert_eq!(doc.render(), before);
}

#[test]
fn synthetic_initial_content_cannot_be_updated() {
    let mut doc = load("## Panel 1: X\n\nLead paragraph.\n\n### Banking Impact\n\nFine print.\n");
    let before = doc.render();
    assert!(!doc.update_named_section_in_panel(1, "Initial Content", "Replaced."));
    assert_eq!(doc.render(), before);
}

#[test]
fn second_update_wins() {
    let mut doc = load(MINIMAL);
    assert!(doc.update_named_section_in_panel(1, "Scene Description", "First draft."));
    assert!(doc.update_named_section_in_panel(1, "Scene Description", "Second draft."));

    let rendered = doc.render();
    assert!(rendered.contains("Second draft."));
    assert!(!rendered.contains("First draft."));
}

#[test]
fn update_flags_the_section_for_review() {
    let mut doc = load(&fixture("chapter-kitchensink.md"));
    assert!(doc.update_named_section_in_panel(2, "Teaching Narrative", "Silence pages too."));

    let panel = doc.panel(2).unwrap();
    let section = panel.section_by_title("Teaching Narrative").unwrap();
    assert!(section.needs_review);
    assert!(panel
        .section_by_title("Scene Description")
        .is_some_and(|s| !s.needs_review));
}

#[test]
fn update_preserves_the_sections_position() {
    let mut doc = load(&fixture("chapter-kitchensink.md"));
    assert!(doc.update_named_section_in_panel(1, "Banking Impact", "Short and sharp."));

    let rendered = doc.render();
    let impact = rendered.find("### Banking Impact").unwrap();
    let practice = rendered.find("### SRE Best Practice").unwrap();
    let guidance = rendered.find("### Implementation Guidance").unwrap();
    assert!(practice < impact && impact < guidance);
}

proptest! {
    #[test]
    fn sanitize_is_idempotent_for_arbitrary_line_soup(
        lines in proptest::collection::vec("[a-zA-Z0-9 #>`*-]{0,24}", 0..12)
    ) {
        let raw = lines.join("\n");
        let once = sanitize_replacement("Scene Description", &raw);
        let twice = sanitize_replacement("Scene Description", &once);
        prop_assert_eq!(once, twice);
    }
}
