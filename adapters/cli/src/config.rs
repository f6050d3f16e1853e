use std::{fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use serde::Deserialize;
use snowfall_core::{LevelTokens, Tuning};

/// Optional TOML file overriding tuning constants and the level token table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) tuning: Tuning,
    pub(crate) tokens: LevelTokens,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> AnyResult<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn parse(text: &str) -> AnyResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
