//! Editor settings management
//!
//! This module provides persistent settings storage for the editor:
//! tree view root, edition panel size and the default log filter.

use crate::edition::DEFAULT_PANEL_WIDTH;
use crate::graph::DEFAULT_ROOT_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main editor settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Settings version for future migration support
    #[serde(default)]
    pub version: u32,

    /// Scene tree settings
    #[serde(default)]
    pub graph: GraphSettings,

    /// Edition panel settings
    #[serde(default)]
    pub edition: EditionSettings,

    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Scene tree configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    /// Id of the synthetic root entry
    pub root_id: String,
    /// Text shown on the root entry
    pub root_label: String,
    /// Select the root after filling the whole scene
    pub auto_select_root: bool,
}

/// Edition panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditionSettings {
    /// Width of the tool containers, in pixels
    pub panel_width: f32,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: 1,
            graph: GraphSettings::default(),
            edition: EditionSettings::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            root_label: "Scene".to_string(),
            auto_select_root: true,
        }
    }
}

impl Default for EditionSettings {
    fn default() -> Self {
        Self {
            panel_width: DEFAULT_PANEL_WIDTH,
        }
    }
}

impl EditorSettings {
    /// Get the default path for the settings file
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("editor_settings.json")
    }

    /// Save settings to a specific path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Saved editor settings to {:?}", path.as_ref());
        Ok(())
    }

    /// Load settings from a specific path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&content)?;
        info!("Loaded editor settings from {:?}", path.as_ref());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings file: {}. Using defaults.", e);
                Self::default()
            }
        }
    }
}
