use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use planarpaint_core::document::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use planarpaint_core::palette::{DEFAULT_PALETTE_LENGTH, MAX_PALETTE_SIZE, MIN_PALETTE_SIZE};
use planarpaint_core::view::DEFAULT_ZOOM;

use crate::history::DEFAULT_HISTORY_LIMIT;

// ---------------------------------------------------------------------------
// Editor preferences
// ---------------------------------------------------------------------------

/// Defaults for new documents and the editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPreferences {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_width")]
    pub default_width: u32,
    #[serde(default = "default_height")]
    pub default_height: u32,
    #[serde(default = "default_palette_length")]
    pub palette_length: usize,
    #[serde(default = "default_zoom")]
    pub default_zoom: u32,
    #[serde(default)]
    pub cycle_animation: bool,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_palette_length() -> usize {
    DEFAULT_PALETTE_LENGTH
}
fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            default_width: default_width(),
            default_height: default_height(),
            palette_length: default_palette_length(),
            default_zoom: default_zoom(),
            cycle_animation: false,
        }
    }
}

impl EditorPreferences {
    /// Load preferences from the OS config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load from an explicit file. Missing or unreadable files give defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<EditorPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs.sanitized();
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// Persist preferences to the OS config directory.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// Pull hand-edited values back into their legal ranges.
    pub fn sanitized(mut self) -> Self {
        self.history_limit = self.history_limit.max(1);
        if self.default_width == 0 {
            self.default_width = DEFAULT_WIDTH;
        }
        if self.default_height == 0 {
            self.default_height = DEFAULT_HEIGHT;
        }
        self.palette_length = self.palette_length.clamp(MIN_PALETTE_SIZE, MAX_PALETTE_SIZE);
        self
    }
}

fn config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "PlanarPaint")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("preferences.json")
}
