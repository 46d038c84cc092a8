//! Application configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use tribunal_council::PanelConfig;
use tribunal_generator::GeneratorConfig;

/// Top-level configuration, one TOML table per crate.
///
/// ```toml
/// [panel]
/// discussion_rounds = 2
///
/// [generator]
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Judge panel settings.
    pub panel: PanelConfig,
    /// Text generator settings.
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads and validates `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        config
            .panel
            .validate()
            .with_context(|| format!("validating {}", path.display()))?;
        Ok(config)
    }
}
