//! Browser settings, read from TOML. Every section is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mocap_browser.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub playback: PlaybackConfig,
    pub viewer: ViewerConfig,
    pub browser: FolderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds between two playback ticks.
    pub tick_interval_ms: u64,
    /// Frames moved by the plain arrow keys.
    pub small_step: i64,
    /// Frames moved by shift + arrow keys.
    pub large_step: i64,
    /// Seed for scene colors; random when unset.
    pub color_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            tick_interval_ms: 30,
            small_step: 1,
            large_step: 15,
            color_seed: None,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Scene units per meter (100 for centimeter rigs).
    pub units_per_meter: f32,
    pub line_width: f32,
    pub background: [f32; 3],
    pub show_grid: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            units_per_meter: 100.0,
            line_width: 4.0,
            background: [80.0 / 255.0, 120.0 / 255.0, 150.0 / 255.0],
            show_grid: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Folder scanned when none is given on the command line.
    pub root_folder: Option<PathBuf>,
}

impl BrowserConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
