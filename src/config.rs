//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ImageError;
use crate::model::Provider;
use crate::params::{ImageSize, OutputFormat, Quality};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Batch defaults, used where the command line is silent.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
    /// `OpenAI` API key.
    pub openai: Option<String>,
}

/// `[batch]` section. Every field is optional; unset fields fall back to the
/// built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    /// Directory the images are written to.
    pub out_dir: Option<PathBuf>,
    /// Model name or alias.
    pub model: Option<String>,
    /// Output format.
    pub format: Option<OutputFormat>,
    /// Aspect ratio.
    pub aspect_ratio: Option<String>,
    /// Resolution tier.
    pub size: Option<ImageSize>,
    /// Quality level.
    pub quality: Option<Quality>,
    /// Images per job.
    pub count: Option<u32>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ImageError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            ImageError::Config(format!("Failed to parse config {}: {e}", path.display()))
        })
    }

    /// API key for `provider`, preferring the environment variable.
    #[must_use]
    pub fn api_key(&self, provider: Provider) -> Option<String> {
        let from_file = match provider {
            Provider::Gemini => &self.keys.gemini,
            Provider::OpenAi => &self.keys.openai,
        };
        std::env::var(provider.key_env_var())
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| from_file.clone())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `INFOGEN_CONFIG` environment variable
/// 3. `~/.config/infogen/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    if let Ok(p) = std::env::var("INFOGEN_CONFIG") {
        return PathBuf::from(p);
    }

    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".config/infogen/config.toml"),
        Err(_) => PathBuf::from("infogen.toml"),
    }
}
