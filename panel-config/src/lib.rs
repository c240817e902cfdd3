//! Shared configuration loader for the panel enrichment pipeline.
//!
//! `defaults/panel.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`PanelConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use panel_doc::CanonicalTitle;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

const DEFAULT_TOML: &str = include_str!("../defaults/panel.default.toml");

/// Top-level configuration consumed by enrichment drivers.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    pub enrichment: EnrichmentConfig,
    pub review: ReviewConfig,
    pub output: OutputConfig,
}

/// Knobs for the enrichment service calls.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    pub model: String,
    pub temperature: f64,
    pub max_retries: u32,
    /// Section titles eligible for enrichment, in processing order.
    pub sections: Vec<String>,
}

impl EnrichmentConfig {
    /// Resolve the configured section titles against the canonical set.
    ///
    /// Titles that are not canonical are skipped with a warning; a typo in a
    /// config file should not abort a batch run.
    pub fn canonical_sections(&self) -> Vec<CanonicalTitle> {
        let mut resolved = Vec::with_capacity(self.sections.len());
        for name in &self.sections {
            match CanonicalTitle::from_title(name) {
                Some(canonical) => resolved.push(canonical),
                None => warn!(
                    section = name.as_str(),
                    "configured section title is not canonical; skipping"
                ),
            }
        }
        resolved
    }
}

/// Controls the human review step after updates.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    pub auto_approve: bool,
}

/// Where rendered chapters land.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub panel_sheet_dir: String,
    pub overwrite: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PanelConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PanelConfig, ConfigError> {
    Loader::new().build()
}
