//! Configuration file support
//!
//! Precedence order (highest to lowest):
//! 1. Command-line arguments (--threshold, --format)
//! 2. Explicit config (--config PATH), or project config (./.textflow.toml)
//! 3. User config (~/.textflow.toml)
//! 4. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use textflow_core::ReadingOrderConfig;

/// File name looked up in the working directory and the home directory
pub const CONFIG_FILE_NAME: &str = ".textflow.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Line clustering settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<ReadingOrderConfig>,

    /// Output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text or json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if let Some(layout) = &config.layout {
            layout
                .validate()
                .with_context(|| format!("Invalid [layout] section in {}", path.display()))?;
        }
        Ok(config)
    }

    /// Resolve the effective file configuration.
    ///
    /// An explicit path must exist and parse. Discovered files that fail to
    /// load are skipped with a warning.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let user = Self::user_config_path().and_then(|p| Self::load_optional(&p));
        let primary = match explicit {
            Some(path) => Some(Self::load_from_file(path)?),
            None => Self::load_optional(Path::new(CONFIG_FILE_NAME)),
        };

        Ok(match (primary, user) {
            (Some(primary), Some(user)) => primary.merged_over(user),
            (Some(config), None) | (None, Some(config)) => config,
            (None, None) => Self::default(),
        })
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {e:#}", path.display());
                None
            }
        }
    }

    /// Field-wise merge: values set in `self` win over `fallback`
    #[must_use]
    pub fn merged_over(self, fallback: Self) -> Self {
        let output = match (self.output, fallback.output) {
            (Some(ours), Some(theirs)) => Some(OutputConfig {
                format: ours.format.or(theirs.format),
            }),
            (ours, theirs) => ours.or(theirs),
        };
        Self {
            layout: self.layout.or(fallback.layout),
            output,
        }
    }

    /// Reading-order config with an optional command-line threshold override
    pub fn reading_order(&self, threshold: Option<f64>) -> Result<ReadingOrderConfig> {
        let mut config = self.layout.unwrap_or_default();
        if let Some(threshold) = threshold {
            config.line_height_threshold = threshold;
        }
        config.validate()?;
        Ok(config)
    }

    /// Output format name from the config file, if any
    pub fn output_format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.format.as_deref())
    }
}
