//! Configuration system tests
//!
//! Tests for config paths and config loading/saving.

use source_view::config::{FontSettings, SourceConfig};
use source_view::config_paths;
use source_view::theme::Appearance;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("source-view"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_themes_and_logs_are_inside_config_dir() {
    if let (Some(base), Some(themes), Some(logs)) = (
        config_paths::config_dir(),
        config_paths::themes_dir(),
        config_paths::logs_dir(),
    ) {
        assert!(themes.starts_with(&base));
        assert!(logs.starts_with(&base));
    }
}

// ========================================================================
// SourceConfig Tests
// ========================================================================

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = SourceConfig {
        light_theme: "github-light".to_string(),
        dark_theme: "github-dark".to_string(),
        appearance: Appearance::Light,
        font: FontSettings {
            family: "Iosevka".to_string(),
            size: 14.0,
            ..FontSettings::default()
        },
        debounce_ms: 75,
    };
    config.save_to(&path).unwrap();

    assert_eq!(SourceConfig::load_from(&path), config);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = SourceConfig::load_from(&dir.path().join("absent.yaml"));
    assert_eq!(config, SourceConfig::default());
}

#[test]
fn test_corrupt_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "debounce_ms: [not, a, number]\n").unwrap();
    assert_eq!(SourceConfig::load_from(&path), SourceConfig::default());
}

#[test]
fn test_theme_set_from_config() {
    let config = SourceConfig {
        dark_theme: "github-dark".to_string(),
        ..SourceConfig::default()
    };
    let set = config.theme_set();
    assert_eq!(set.dark.name, "GitHub Dark");
    assert_eq!(set.light.name, "Default Light");
}
