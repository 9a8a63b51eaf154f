//! Viewer settings with persistence
//!
//! Settings are read from `~/.config/glimmer/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use glimmer_assets::DecodeConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Directory relative resource names are resolved against
    pub asset_root: PathBuf,
    /// Decoder configuration
    pub decode: DecodeConfig,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            asset_root: PathBuf::from("."),
            decode: DecodeConfig::default(),
        }
    }
}

impl ViewerSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("glimmer"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }
}
