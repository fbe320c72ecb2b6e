//! Highlighter configuration persistence
//!
//! Stores user preferences in `~/.config/source-view/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::font::{Faces, FontConfiguration, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::theme::{Appearance, ThemeSet};
use crate::update::HIGHLIGHT_DEBOUNCE_MS;

/// Font section of the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(default = "default_family")]
    pub family: String,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Faces the family provides
    #[serde(default)]
    pub faces: Faces,
}

fn default_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_scale() -> f32 {
    1.0
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: default_size(),
            scale: default_scale(),
            faces: Faces::default(),
        }
    }
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Theme id used in light appearance (e.g., "default-light", "github-light")
    #[serde(default = "default_light_theme")]
    pub light_theme: String,
    /// Theme id used in dark appearance
    #[serde(default = "default_dark_theme")]
    pub dark_theme: String,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub font: FontSettings,
    /// Delay between an edit and its highlight pass
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_light_theme() -> String {
    "default-light".to_string()
}

fn default_dark_theme() -> String {
    "default-dark".to_string()
}

fn default_debounce_ms() -> u64 {
    HIGHLIGHT_DEBOUNCE_MS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            light_theme: default_light_theme(),
            dark_theme: default_dark_theme(),
            appearance: Appearance::default(),
            font: FontSettings::default(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SourceConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Load the configured light and dark themes
    pub fn theme_set(&self) -> ThemeSet {
        ThemeSet::load(&self.light_theme, &self.dark_theme)
    }

    pub fn font_configuration(&self) -> FontConfiguration {
        FontConfiguration::new(&self.font.family, self.font.size)
            .with_scale(self.font.scale)
            .with_faces(self.font.faces)
    }
}
