//! Theme system
//!
//! Provides YAML-based themes with compile-time embedded built-ins and
//! user-defined themes from the config directory.
//!
//! Theme loading priority:
//! 1. User config: `~/.config/source-view/themes/{id}.yaml`
//! 2. Embedded: Built-in themes compiled into binary
//!
//! A theme maps style-context indices ([`HighlightId`]) to foreground and
//! background colors. Entries are written by capture name in YAML; a dotted
//! name without its own entry inherits from its closest configured parent.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::font::FontTraits;
use crate::syntax::{parent_highlight, HighlightId, HIGHLIGHT_NAMES};

// Embed theme YAML files at compile time
pub const DEFAULT_DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const DEFAULT_LIGHT_YAML: &str = include_str!("../themes/light.yaml");
pub const GITHUB_DARK_YAML: &str = include_str!("../themes/github-dark.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../themes/github-light.yaml");

/// A built-in theme entry
pub struct BuiltinTheme {
    /// Stable identifier for config (e.g. "default-dark", "github-light")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in themes
pub const BUILTIN_THEMES: &[BuiltinTheme] = &[
    BuiltinTheme {
        id: "default-dark",
        yaml: DEFAULT_DARK_YAML,
    },
    BuiltinTheme {
        id: "default-light",
        yaml: DEFAULT_LIGHT_YAML,
    },
    BuiltinTheme {
        id: "github-dark",
        yaml: GITHUB_DARK_YAML,
    },
    BuiltinTheme {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
];

/// Where the theme came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    /// User-defined theme in ~/.config/source-view/themes/
    User,
    /// Built-in theme embedded in binary
    Builtin,
}

/// Information about an available theme
#[derive(Debug, Clone)]
pub struct ThemeInfo {
    pub id: String,
    /// Display name from YAML (e.g., "Default Dark")
    pub name: String,
    pub source: ThemeSource,
}

/// Light or dark system appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    #[default]
    Dark,
}

/// Load a theme from a YAML file
pub fn from_file(path: &Path) -> Result<Theme, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read theme file {}: {}", path.display(), e))?;
    Theme::from_yaml(&content)
}

/// Load theme by id with priority: user → builtin
pub fn load_theme(id: &str) -> Result<Theme, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", id));
        if user_path.exists() {
            tracing::info!("Loading user theme from {}", user_path.display());
            return from_file(&user_path);
        }
    }

    tracing::debug!("Loading builtin theme: {}", id);
    Theme::from_builtin(id)
}

/// List all available themes from all sources
///
/// User themes override builtins with the same id.
pub fn list_available_themes() -> Vec<ThemeInfo> {
    let mut themes = Vec::new();
    let mut seen_ids = std::collections::HashSet::new();

    if let Some(user_dir) = crate::config_paths::themes_dir() {
        if let Ok(entries) = std::fs::read_dir(&user_dir) {
            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if !path
                    .extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
                {
                    continue;
                }
                let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if seen_ids.insert(id.to_string()) {
                    let name = from_file(&path)
                        .map(|t| t.name)
                        .unwrap_or_else(|_| id.to_string());
                    themes.push(ThemeInfo {
                        id: id.to_string(),
                        name,
                        source: ThemeSource::User,
                    });
                }
            }
        }
    }

    for builtin in BUILTIN_THEMES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Theme::from_yaml(builtin.yaml)
                .map(|t| t.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            themes.push(ThemeInfo {
                id: builtin.id.to_string(),
                name,
                source: ThemeSource::Builtin,
            });
        }
    }

    themes
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }


    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| format!("{}: {}", s, e))
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// Format as "#RRGGBB" (or "#RRGGBBAA" when not opaque)
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Raw theme data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub appearance: Appearance,
    pub editor: EditorThemeData,
    #[serde(default)]
    pub font: FontThemeData,
    /// Capture name → foreground hex
    #[serde(default)]
    pub syntax: BTreeMap<String, String>,
    /// Capture name → background hex
    #[serde(default)]
    pub backgrounds: BTreeMap<String, String>,
}

/// Text area colors
#[derive(Debug, Clone, Deserialize)]
pub struct EditorThemeData {
    pub background: String,
    pub foreground: String,
    #[serde(default)]
    pub caret: Option<String>,
}

/// Default font traits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FontThemeData {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

/// Resolved theme with parsed colors
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub appearance: Appearance,
    /// Default foreground for untokenized text
    pub foreground: Color,
    pub background: Color,
    pub caret: Color,
    /// Traits applied to the base font
    pub font_traits: FontTraits,
    /// Foreground colors indexed by HighlightId
    syntax: Vec<Option<Color>>,
    /// Background colors indexed by HighlightId
    backgrounds: Vec<Option<Color>>,
}

/// Look up a table entry, walking up dotted parents until one is set
fn lookup(table: &[Option<Color>], id: HighlightId) -> Option<Color> {
    let mut current = id;
    loop {
        if let Some(color) = table.get(current as usize).copied().flatten() {
            return Some(color);
        }
        current = parent_highlight(current)?;
    }
}

/// Table slot for a capture name. Only exact names; a misspelt key must not
/// silently style its parent.
fn table_slot(name: &str) -> Option<usize> {
    HIGHLIGHT_NAMES.iter().position(|&n| n == name)
}

fn resolve_table(entries: &BTreeMap<String, String>) -> Result<Vec<Option<Color>>, String> {
    let mut table = vec![None; HIGHLIGHT_NAMES.len()];
    for (name, hex) in entries {
        match table_slot(name) {
            Some(idx) => table[idx] = Some(Color::from_hex(hex)?),
            None => tracing::warn!("Ignoring unknown highlight name in theme: {}", name),
        }
    }
    Ok(table)
}

impl Theme {
    /// Theme with only default colors and empty tables
    pub fn plain(name: &str, appearance: Appearance, foreground: Color, background: Color) -> Self {
        Self {
            name: name.to_string(),
            appearance,
            foreground,
            background,
            caret: foreground,
            font_traits: FontTraits::empty(),
            syntax: vec![None; HIGHLIGHT_NAMES.len()],
            backgrounds: vec![None; HIGHLIGHT_NAMES.len()],
        }
    }

    /// Set the foreground for a capture name (builder style)
    pub fn with_syntax_color(mut self, name: &str, color: Color) -> Self {
        match table_slot(name) {
            Some(idx) => self.syntax[idx] = Some(color),
            None => tracing::warn!("Ignoring unknown highlight name: {}", name),
        }
        self
    }

    /// Set the background for a capture name (builder style)
    pub fn with_background_color(mut self, name: &str, color: Color) -> Self {
        match table_slot(name) {
            Some(idx) => self.backgrounds[idx] = Some(color),
            None => tracing::warn!("Ignoring unknown highlight name: {}", name),
        }
        self
    }

    pub fn with_font_traits(mut self, traits: FontTraits) -> Self {
        self.font_traits = traits;
        self
    }

    /// Foreground for a style-context index
    pub fn foreground_for(&self, id: HighlightId) -> Option<Color> {
        lookup(&self.syntax, id)
    }

    /// Background for a style-context index
    pub fn background_for(&self, id: HighlightId) -> Option<Color> {
        lookup(&self.backgrounds, id)
    }

    /// Load theme from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: ThemeData =
            serde_yaml::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))?;
        Self::from_data(data)
    }

    /// Load a built-in theme by id
    pub fn from_builtin(id: &str) -> Result<Self, String> {
        let entry = BUILTIN_THEMES
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| format!("Unknown theme id: {}", id))?;
        Theme::from_yaml(entry.yaml)
    }

    /// Convert raw theme data to resolved theme
    pub fn from_data(data: ThemeData) -> Result<Self, String> {
        let foreground = Color::from_hex(&data.editor.foreground)?;
        let mut font_traits = FontTraits::empty();
        if data.font.bold {
            font_traits = font_traits | FontTraits::BOLD;
        }
        if data.font.italic {
            font_traits = font_traits | FontTraits::ITALIC;
        }

        Ok(Theme {
            name: data.name,
            appearance: data.appearance,
            foreground,
            background: Color::from_hex(&data.editor.background)?,
            caret: data
                .editor
                .caret
                .as_ref()
                .map(|s| Color::from_hex(s))
                .transpose()?
                .unwrap_or(foreground),
            font_traits,
            syntax: resolve_table(&data.syntax)?,
            backgrounds: resolve_table(&data.backgrounds)?,
        })
    }

    /// Default dark theme (YAML-backed with Rust fallback)
    pub fn default_dark() -> Self {
        Theme::from_yaml(DEFAULT_DARK_YAML).unwrap_or_else(|e| {
            tracing::error!("Built-in dark theme failed to parse: {}", e);
            Theme::plain(
                "Default Dark",
                Appearance::Dark,
                Color::rgb(0xD4, 0xD4, 0xD4),
                Color::rgb(0x1E, 0x1E, 0x1E),
            )
        })
    }

    /// Default light theme (YAML-backed with Rust fallback)
    pub fn default_light() -> Self {
        Theme::from_yaml(DEFAULT_LIGHT_YAML).unwrap_or_else(|e| {
            tracing::error!("Built-in light theme failed to parse: {}", e);
            Theme::plain(
                "Default Light",
                Appearance::Light,
                Color::rgb(0x1F, 0x1F, 0x1F),
                Color::rgb(0xFF, 0xFF, 0xFF),
            )
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

/// A light and a dark theme, switched by appearance
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSet {
    pub light: Arc<Theme>,
    pub dark: Arc<Theme>,
}

impl Default for ThemeSet {
    fn default() -> Self {
        Self {
            light: Arc::new(Theme::default_light()),
            dark: Arc::new(Theme::default_dark()),
        }
    }
}

impl ThemeSet {
    pub fn new(light: Theme, dark: Theme) -> Self {
        Self {
            light: Arc::new(light),
            dark: Arc::new(dark),
        }
    }

    /// Load both themes by id, falling back to the defaults on error
    pub fn load(light_id: &str, dark_id: &str) -> Self {
        let light = load_theme(light_id).unwrap_or_else(|e| {
            tracing::warn!("Failed to load light theme '{}': {}", light_id, e);
            Theme::default_light()
        });
        let dark = load_theme(dark_id).unwrap_or_else(|e| {
            tracing::warn!("Failed to load dark theme '{}': {}", dark_id, e);
            Theme::default_dark()
        });
        Self::new(light, dark)
    }

    pub fn for_appearance(&self, appearance: Appearance) -> Arc<Theme> {
        match appearance {
            Appearance::Light => Arc::clone(&self.light),
            Appearance::Dark => Arc::clone(&self.dark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::highlight_id_for_name;

    #[test]
    fn test_parent_fallback() {
        let theme = Theme::plain("t", Appearance::Dark, Color::rgb(1, 1, 1), Color::rgb(0, 0, 0))
            .with_syntax_color("keyword", Color::rgb(0, 0, 255));
        let ret = highlight_id_for_name("keyword.return").unwrap();
        assert_eq!(theme.foreground_for(ret), Some(Color::rgb(0, 0, 255)));

        let string = highlight_id_for_name("string").unwrap();
        assert_eq!(theme.foreground_for(string), None);
    }

    #[test]
    fn test_specific_entry_beats_parent() {
        let theme = Theme::plain("t", Appearance::Dark, Color::rgb(1, 1, 1), Color::rgb(0, 0, 0))
            .with_syntax_color("keyword", Color::rgb(0, 0, 255))
            .with_syntax_color("keyword.return", Color::rgb(255, 0, 0));
        let ret = highlight_id_for_name("keyword.return").unwrap();
        assert_eq!(theme.foreground_for(ret), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_builder_ignores_unregistered_names() {
        let theme = Theme::plain("t", Appearance::Dark, Color::rgb(1, 1, 1), Color::rgb(0, 0, 0))
            .with_syntax_color("keyword.control", Color::rgb(0, 0, 255))
            .with_background_color("keyword.control", Color::rgb(0, 255, 0));
        let keyword = highlight_id_for_name("keyword").unwrap();
        assert_eq!(theme.foreground_for(keyword), None);
        assert_eq!(theme.background_for(keyword), None);
    }

    #[test]
    fn test_out_of_range_index() {
        let theme = Theme::default_dark();
        assert_eq!(theme.foreground_for(u16::MAX), None);
        assert_eq!(theme.background_for(u16::MAX), None);
    }

    #[test]
    fn test_unknown_yaml_keys_are_ignored() {
        let yaml = r##"
version: 1
name: "Odd"
editor:
  background: "#000000"
  foreground: "#FFFFFF"
syntax:
  keyword: "#FF0000"
  keywrod: "#00FF00"
"##;
        let theme = Theme::from_yaml(yaml).unwrap();
        let keyword = highlight_id_for_name("keyword").unwrap();
        assert_eq!(theme.foreground_for(keyword), Some(Color::rgb(255, 0, 0)));
        assert_eq!(theme.caret, Color::rgb(255, 255, 255));
        assert_eq!(theme.appearance, Appearance::Dark);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::rgb(0x1E, 0x2F, 0xA0).to_hex(), "#1E2FA0");
        assert_eq!(Color::rgba(0, 0, 0, 0x80).to_hex(), "#00000080");
    }

    #[test]
    fn test_theme_set_for_appearance() {
        let set = ThemeSet::default();
        assert_eq!(set.for_appearance(Appearance::Light).appearance, Appearance::Light);
        assert_eq!(set.for_appearance(Appearance::Dark).appearance, Appearance::Dark);
    }
}
