//! Verba configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "verba.toml";

/// Top-level Verba configuration (verba.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VerbaConfig {
    #[serde(default)]
    pub locale: LocaleConfig,
}

/// Locale selection
#[derive(Debug, Deserialize, Serialize)]
pub struct LocaleConfig {
    /// Language used when no `--lang` or `--dict` is given
    #[serde(default = "default_locale")]
    pub default: String,
    /// Extra dictionary files, indexed by their `name`
    #[serde(default)]
    pub dictionaries: Vec<PathBuf>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default: default_locale(),
            dictionaries: Vec::new(),
        }
    }
}

impl VerbaConfig {
    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        // Dictionary paths are relative to the config file.
        if let Some(dir) = path.parent() {
            for dict in &mut config.locale.dictionaries {
                if dict.is_relative() {
                    *dict = dir.join(&*dict);
                }
            }
        }
        Ok(config)
    }

    /// Load `verba.toml` from `dir` if present, defaults otherwise.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid verba.toml")
    }
}
