//! Document model for SRE training comic chapters
//!
//!     A chapter is a Markdown file with one H1 title and a row of panels,
//!     each panel an H2 whose heading starts with "Panel ". Panels carry H3
//!     teaching sections (Scene Description, Teaching Narrative, ...) which
//!     in turn may carry H4 sub-sections. This crate parses such a file into
//!     a typed tree, gives every node a stable address (panel number,
//!     section number within the panel), lets the enrichment pipeline swap
//!     the content of one named H3 without touching its siblings, and writes
//!     the document back out.
//!
//!     TLDR for consumers:
//!         - ChapterDocument is the whole API: load, list_panels,
//!           extract_named_sections_from_panel, update_named_section_in_panel,
//!           render, save.
//!         - Unmodified documents round-trip byte for byte, modulo blank-line
//!           collapsing. Do not expect the core to reflow anything else.
//!         - The LLM client, review UI, CLI and batch drivers live outside
//!           this crate. They only ever see panel handles and Markdown
//!           strings.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── blocks.rs       # comrak adapter; Block tokens with source slices
//!     ├── model.rs        # Chapter → Panel → Section → Subsection tree
//!     ├── builder.rs      # single-pass tree construction
//!     ├── sections.rs     # canonical titles, extraction, sanitized updates
//!     ├── render.rs       # tree → Markdown reconstruction
//!     ├── validate.rs     # ordinal checks (warnings, never fatal)
//!     ├── document.rs     # file I/O + the public session type
//!     └── error.rs
//!
//!     The one design decision worth knowing about: blocks keep the exact
//!     Markdown lines they were parsed from, and everything downstream
//!     (section extraction, sanitizing, rendering) works on those canonical
//!     strings, reparsing on demand. There is no second live AST to keep in
//!     sync. The comrak AST exists only inside parse_blocks.
//!
//! Error policy
//!
//!     Fatal: non-UTF-8 input and a second H1 (DocumentError). Everything
//!     else recovers locally: unreadable/unwritable files and update misses
//!     return false and log, validation findings are warnings.

pub mod blocks;
pub mod builder;
pub mod document;
pub mod error;
pub mod model;
pub mod render;
pub mod sections;
pub mod validate;

pub use document::ChapterDocument;
pub use error::DocumentError;
pub use model::{Chapter, Element, GenericContent, Panel, Section, SectionKind, Subsection};
pub use sections::CanonicalTitle;
pub use validate::ValidationIssue;
