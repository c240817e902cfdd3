//! Structural identifier validation.
//!
//! Runs after the builder. Findings are warnings, never errors: the tree is
//! returned to the caller either way. The one fatal structural check (a
//! second H1) belongs to the builder itself.

use std::collections::HashSet;

use tracing::warn;

use crate::model::{Chapter, SectionKind};

/// A non-fatal structural finding, tied to the source line it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub message: String,
    pub line: usize,
}

/// Check ordinal uniqueness and addressability across the chapter tree.
///
/// Every finding is logged; the returned list lets drivers surface them in
/// reports.
pub fn validate_chapter(chapter: &Chapter) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut panel_numbers = HashSet::new();
    for panel in chapter.panels() {
        if panel.number == 0 {
            issues.push(ValidationIssue {
                message: format!("panel '{}' has no document ordinal", panel.title),
                line: panel.line,
            });
        } else if !panel_numbers.insert(panel.number) {
            issues.push(ValidationIssue {
                message: format!(
                    "duplicate panel number {} for '{}'",
                    panel.number, panel.title
                ),
                line: panel.line,
            });
        }

        let mut section_numbers = HashSet::new();
        let mut section_titles = HashSet::new();
        for section in &panel.sections {
            if !section_numbers.insert(section.number) {
                issues.push(ValidationIssue {
                    message: format!(
                        "duplicate section number {} in panel {}",
                        section.number, panel.number
                    ),
                    line: section.line,
                });
            }
            if section.kind == SectionKind::Real && !section_titles.insert(section.title.as_str())
            {
                issues.push(ValidationIssue {
                    message: format!(
                        "duplicate section title '{}' in panel {}; updates address the first match",
                        section.title, panel.number
                    ),
                    line: section.line,
                });
            }

            let mut subsection_numbers = HashSet::new();
            for subsection in &section.subsections {
                if !subsection_numbers.insert(subsection.number) {
                    issues.push(ValidationIssue {
                        message: format!(
                            "duplicate subsection number {} in section '{}'",
                            subsection.number, section.title
                        ),
                        line: subsection.line,
                    });
                }
                if subsection.title.is_empty() {
                    issues.push(ValidationIssue {
                        message: "subsection has an empty heading".to_string(),
                        line: subsection.line,
                    });
                }
            }
        }
    }

    for issue in &issues {
        warn!(line = issue.line, "{}", issue.message);
    }

    issues
}
