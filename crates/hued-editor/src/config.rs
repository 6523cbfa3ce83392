//! Editor configuration — the optional `hued.toml`.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! | Key              | Type    | Default              |
//! |------------------|---------|----------------------|
//! | `steps`          | integer | 5                    |
//! | `session_path`   | path    | `.hued-session.json` |
//! | `preview_width`  | integer | 240                  |
//! | `preview_height` | integer | 40                   |
//!
//! `steps` is the ramp length N shared by every bar; it must be at least 1.

use std::path::{Path, PathBuf};

use hued_theme::DEFAULT_STEPS;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SESSION_PATH: &str = ".hued-session.json";
pub const DEFAULT_PREVIEW_WIDTH: u32 = 240;
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 40;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("steps must be at least 1, got {0}")]
    InvalidSteps(usize),

    #[error("preview size must be non-zero, got {width}x{height}")]
    InvalidPreviewSize { width: u32, height: u32 },
}

/// Settings shared by the editor and the command-line front end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub steps: usize,
    pub session_path: PathBuf,
    pub preview_width: u32,
    pub preview_height: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            preview_width: DEFAULT_PREVIEW_WIDTH,
            preview_height: DEFAULT_PREVIEW_HEIGHT,
        }
    }
}

impl EditorConfig {
    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for bad TOML or unknown keys, or a
    /// validation error from [`EditorConfig::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EditorConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges. Call again after overriding fields by hand.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidSteps`] or [`ConfigError::InvalidPreviewSize`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps < 1 {
            return Err(ConfigError::InvalidSteps(self.steps));
        }
        if self.preview_width == 0 || self.preview_height == 0 {
            return Err(ConfigError::InvalidPreviewSize {
                width: self.preview_width,
                height: self.preview_height,
            });
        }
        Ok(())
    }
}
