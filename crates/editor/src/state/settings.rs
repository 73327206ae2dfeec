//! Editor settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EditorResult;

/// Geometry defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Angular steps of a full revolve
    pub revolve_resolution: u32,
    /// Samples per profile for a loft
    pub loft_resolution: usize,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            revolve_resolution: 60,
            loft_resolution: 30,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Maximum number of undoable commands; `None` keeps everything
    pub history_limit: Option<usize>,
    /// Directory scanned for plugin manifests
    pub plugin_dir: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
    pub geometry: GeometrySettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_limit: None,
            plugin_dir: PathBuf::from("plugins"),
            log_filter: "mesh_editor=info".to_string(),
            geometry: GeometrySettings::default(),
        }
    }
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mesh-editor", "mesh-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the platform config dir, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Save settings to the platform config dir
    pub fn save(&self) -> EditorResult<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn load_from(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> EditorResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
