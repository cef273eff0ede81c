//! Configuration
//!
//! [`ChessLmConfig`] holds the dataset windowing, decoding and play-session
//! settings. It is stored as JSON.
//!
//! # File Location
//!
//! 1. An explicit path (`--config`) must exist and parse
//! 2. Otherwise `config.json` in the platform config directory, e.g.
//!    `~/.config/chess-lm/config.json` on Linux
//! 3. Otherwise built-in defaults
//!
//! A broken file in the platform directory is logged and skipped; a broken
//! explicit file is a [`ChessLmError::ConfigurationError`].

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::BoundaryMode;
use crate::decoder::ScoreKind;
use crate::error::{ChessLmError, ChessLmResult};

/// Config filename
const CONFIG_FILENAME: &str = "config.json";

/// Training-window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub window_length: usize,
    pub stride: usize,
    pub boundary: BoundaryMode,
    /// Fraction of games held out for validation, in `[0, 1)`
    pub validation_split: f64,
    pub seed: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            window_length: 64,
            stride: 64,
            boundary: BoundaryMode::PerGame,
            validation_split: 0.1,
            seed: 42,
        }
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> ChessLmResult<()> {
        if self.window_length == 0 {
            return Err(ChessLmError::config("dataset.window_length must be at least 1"));
        }
        if self.stride == 0 || self.stride > self.window_length {
            return Err(ChessLmError::config(format!(
                "dataset.stride must be in 1..={}, got {}",
                self.window_length, self.stride
            )));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(ChessLmError::config(format!(
                "dataset.validation_split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}

/// Move selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingConfig {
    pub temperature: f64,
    /// Keep only the k most likely legal moves
    pub top_k: Option<usize>,
    /// Argmax instead of sampling
    pub greedy: bool,
    pub score_kind: ScoreKind,
    /// Fixed RNG seed for reproducible play
    pub seed: Option<u64>,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        DecodingConfig {
            temperature: 1.0,
            top_k: None,
            greedy: false,
            score_kind: ScoreKind::Logits,
            seed: None,
        }
    }
}

impl DecodingConfig {
    pub fn validate(&self) -> ChessLmResult<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(ChessLmError::config(format!(
                "decoding.temperature must be a positive number, got {}",
                self.temperature
            )));
        }
        if self.top_k == Some(0) {
            return Err(ChessLmError::config("decoding.top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChessLmConfig {
    pub dataset: DatasetConfig,
    pub decoding: DecodingConfig,
    /// Longest token context handed to the model during play
    pub max_context: usize,
}

impl Default for ChessLmConfig {
    fn default() -> Self {
        ChessLmConfig {
            dataset: DatasetConfig::default(),
            decoding: DecodingConfig::default(),
            max_context: 256,
        }
    }
}

impl ChessLmConfig {
    /// Path of `config.json` in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "trilltino", "chess-lm")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Resolve and load the configuration (see module docs for the order)
    pub fn load(explicit: Option<&Path>) -> ChessLmResult<Self> {
        if let Some(path) = explicit {
            let config = Self::load_from(path)?;
            info!("[CONFIG] Loaded configuration from {:?}", path);
            return Ok(config);
        }

        match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => {
                    info!("[CONFIG] Loaded configuration from {:?}", path);
                    Ok(config)
                }
                Err(e) => {
                    warn!(
                        "[CONFIG] Failed to load configuration at {:?}: {}. Using defaults.",
                        path, e
                    );
                    Ok(Self::default())
                }
            },
            Some(path) => {
                info!("[CONFIG] No configuration file found at {:?}. Using defaults.", path);
                Ok(Self::default())
            }
            None => {
                info!("[CONFIG] No config directory available. Using defaults.");
                Ok(Self::default())
            }
        }
    }

    /// Read, parse and validate one file
    pub fn load_from(path: &Path) -> ChessLmResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ChessLmError::config(format!("cannot read configuration {:?}: {}", path, e))
        })?;
        let config: ChessLmConfig = serde_json::from_str(&contents).map_err(|e| {
            ChessLmError::config(format!("cannot parse configuration {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ChessLmResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("[CONFIG] Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> ChessLmResult<()> {
        self.dataset.validate()?;
        self.decoding.validate()?;
        if self.max_context < 2 {
            return Err(ChessLmError::config("max_context must be at least 2"));
        }
        Ok(())
    }
}
