//! Chapter document sessions: load, address, update, render, save.
//!
//! [`ChapterDocument`] is the surface the enrichment pipeline and batch
//! drivers talk to. It owns at most one chapter tree at a time; loading
//! replaces any previous tree and the rendered Markdown is the only
//! persisted artifact. Single-threaded by design: drivers that want
//! parallelism create one document per input file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{error, warn};

use crate::blocks::parse_blocks;
use crate::builder::build_chapter;
use crate::error::DocumentError;
use crate::model::{Chapter, Panel};
use crate::render::render_chapter;
use crate::sections::{extract_named_sections, update_named_section, CanonicalTitle};
use crate::validate::validate_chapter;

/// One loaded chapter and the operations defined over it.
#[derive(Debug, Default)]
pub struct ChapterDocument {
    chapter: Option<Chapter>,
}

impl ChapterDocument {
    pub fn new() -> ChapterDocument {
        ChapterDocument::default()
    }

    /// Read, tokenize, build and validate a chapter source.
    ///
    /// Returns `Ok(false)` when the file cannot be read; any previously
    /// loaded tree is cleared so stale state cannot leak into later
    /// operations. Non-UTF-8 bytes and structural violations are errors.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool, DocumentError> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(path = %path.display(), %err, "failed to read chapter source");
                self.chapter = None;
                return Ok(false);
            }
        };

        let source = String::from_utf8(bytes)
            .map_err(|err| DocumentError::Encoding(format!("{}: {err}", path.display())))?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("<unnamed>")
            .to_string();
        self.load_str(&source, &name)
    }

    /// Build a chapter from an in-memory source.
    ///
    /// Validation findings are logged; the tree is kept regardless.
    pub fn load_str(&mut self, source: &str, source_file: &str) -> Result<bool, DocumentError> {
        let blocks = parse_blocks(source);
        let chapter = match build_chapter(&blocks, source_file) {
            Ok(chapter) => chapter,
            Err(err) => {
                self.chapter = None;
                return Err(err);
            }
        };
        validate_chapter(&chapter);
        self.chapter = Some(chapter);
        Ok(true)
    }

    pub fn chapter(&self) -> Option<&Chapter> {
        self.chapter.as_ref()
    }

    /// Panels in source order.
    pub fn list_panels(&self) -> Vec<&Panel> {
        self.chapter
            .iter()
            .flat_map(|chapter| chapter.panels())
            .collect()
    }

    /// Panel by 1-based document ordinal.
    pub fn panel(&self, number: u32) -> Option<&Panel> {
        self.chapter.as_ref().and_then(|chapter| chapter.panel(number))
    }

    /// Canonical-section map for one panel; `None` when the panel is absent.
    pub fn extract_named_sections_from_panel(
        &self,
        number: u32,
    ) -> Option<BTreeMap<CanonicalTitle, String>> {
        self.panel(number).map(extract_named_sections)
    }

    /// Replace a named section's content inside one panel.
    ///
    /// Misses (no chapter, no such panel, no such section) return false and
    /// log without mutating anything.
    pub fn update_named_section_in_panel(
        &mut self,
        number: u32,
        title: &str,
        new_markdown: &str,
    ) -> bool {
        let Some(chapter) = self.chapter.as_mut() else {
            warn!("update requested with no chapter loaded");
            return false;
        };
        let Some(panel) = chapter.panel_mut(number) else {
            warn!(panel = number, "update targets a panel the chapter does not have");
            return false;
        };
        update_named_section(panel, title, new_markdown)
    }

    /// Reconstruct the full Markdown document from the tree.
    pub fn render(&self) -> String {
        self.chapter.as_ref().map(render_chapter).unwrap_or_default()
    }

    /// Render and write the document.
    ///
    /// Returns `Ok(false)` when the destination cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<bool, DocumentError> {
        let path = path.as_ref();
        match fs::write(path, self.render()) {
            Ok(()) => Ok(true),
            Err(err) => {
                error!(path = %path.display(), %err, "failed to write chapter output");
                Ok(false)
            }
        }
    }
}
