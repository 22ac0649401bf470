//! # CAP Config
//!
//! Engine thresholds. Defaults reproduce the reference classifier; a YAML
//! or JSON file can override any subset of them.
//!
//! Default location: `~/.config/cap/engine.yaml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result type for cap-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Classification engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sequences shorter than this are never classified
    pub min_beats: usize,
    /// Compound guard: max distinct primary labels across quartered pairs
    pub compound_max_distinct_patterns: usize,
    /// Columns used by modular detection
    pub modular_cycle_length: usize,
    /// Report both the plain and `_inverted` label when rotation evidence is missing
    pub report_ambiguous_inversions: bool,
    /// Look for mirror/flip alternation when no uniform pattern exists
    pub detect_axis_alternation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_beats: 2,
            compound_max_distinct_patterns: 2,
            modular_cycle_length: 4,
            report_ambiguous_inversions: true,
            detect_axis_alternation: true,
        }
    }
}

impl EngineConfig {
    /// Default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cap")
            .join("engine.yaml")
    }

    /// Load from a YAML or JSON file (chosen by extension)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, or use defaults if there is no file
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write as YAML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_beats < 2 {
            return Err(Error::Invalid(format!(
                "min_beats must be at least 2, got {}",
                self.min_beats
            )));
        }
        if self.compound_max_distinct_patterns == 0 {
            return Err(Error::Invalid(
                "compound_max_distinct_patterns must be positive".into(),
            ));
        }
        if self.modular_cycle_length == 0 {
            return Err(Error::Invalid("modular_cycle_length must be positive".into()));
        }
        Ok(())
    }
}
