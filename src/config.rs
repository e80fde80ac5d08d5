//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Description of the model to sample for.
    #[serde(default)]
    pub model: ModelConfig,

    /// Default sampling parameters (used when CLI flags are not given).
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Model description.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Noise dimensionality.
    pub z_size: usize,
    /// Noise registry key.
    pub z_type: String,
    /// Class count; zero for unconditional models.
    pub num_classes: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { z_size: 128, z_type: "normal".to_string(), num_classes: 0 }
    }
}

/// Default sampling parameters from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Number of samples to draw.
    pub count: usize,
    /// Samples drawn per batch.
    pub batch_size: usize,
    /// Output format when no output path is given.
    pub format: String,
    /// Seed for reproducible sampling.
    pub seed: Option<u64>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { count: 64, batch_size: 64, format: "yaml".to_string(), seed: None }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the sampling seed, preferring the `GENMODEL_SEED` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if `GENMODEL_SEED` is set but is not an unsigned integer.
    pub fn seed(&self) -> Result<Option<u64>, String> {
        match std::env::var("GENMODEL_SEED") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| format!("Invalid GENMODEL_SEED '{raw}': {e}")),
            Err(_) => Ok(self.defaults.seed),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `GENMODEL_CONFIG` environment variable
/// 3. `~/.config/genmodel/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("GENMODEL_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/genmodel/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/genmodel/config.toml")
    } else {
        PathBuf::from("genmodel.toml")
    }
}
