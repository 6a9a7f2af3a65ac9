//! Configuration system tests
//!
//! Tests for config paths and highlight config loading/saving.

use tintcode::config_paths;
use tintcode::marshal::{DEFAULT_ENUMERATION_CAPACITY, DEFAULT_RENDER_CAPACITY};
use tintcode::{HighlightConfig, OutputFormat};

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_contains_app_name() {
    if let Some(dir) = config_paths::config_dir() {
        assert!(dir.to_string_lossy().contains("tintcode"));
    }
}

#[test]
fn test_config_file_ends_with_yaml() {
    if let Some(path) = config_paths::config_file() {
        assert!(path.to_string_lossy().ends_with("config.yaml"));
    }
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    if let (Some(config), Some(logs)) = (config_paths::config_dir(), config_paths::logs_dir()) {
        assert!(logs.starts_with(&config));
    }
}

// ========================================================================
// Highlight Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = HighlightConfig::default();
    assert_eq!(config.theme, "InspiredGitHub");
    assert_eq!(config.fallback_theme, "InspiredGitHub");
    assert!(config.newline_variants);
    assert_eq!(config.format, OutputFormat::Html);
    assert_eq!(config.buffer.initial_capacity, DEFAULT_RENDER_CAPACITY);
    assert_eq!(config.enumeration_capacity, DEFAULT_ENUMERATION_CAPACITY);
}

#[test]
fn test_empty_yaml_is_default() {
    let config = HighlightConfig::from_yaml("{}").unwrap();
    assert_eq!(config, HighlightConfig::default());
}

#[test]
fn test_full_yaml() {
    let yaml = r#"
theme: "Solarized (light)"
fallback_theme: base16-ocean.dark
newline_variants: false
format: classed_html
buffer:
  initial_capacity: 4096
  max_doublings: 3
enumeration_capacity: 2048
resolve_capacity: 64
"#;
    let config = HighlightConfig::from_yaml(yaml).unwrap();

    assert_eq!(config.theme, "Solarized (light)");
    assert_eq!(config.fallback_theme, "base16-ocean.dark");
    assert!(!config.newline_variants);
    assert_eq!(config.format, OutputFormat::ClassedHtml);
    assert_eq!(config.buffer.initial_capacity, 4096);
    assert_eq!(config.buffer.max_doublings, 3);

    let buffers = config.registry_buffers();
    assert_eq!(buffers.enumeration.initial_capacity, 2048);
    assert_eq!(buffers.resolve.initial_capacity, 64);
    assert_eq!(buffers.enumeration.max_doublings, 3);
}

#[test]
fn test_invalid_yaml_is_error() {
    assert!(HighlightConfig::from_yaml("format: sparkles").is_err());
    assert!(HighlightConfig::from_yaml("buffer: [1, 2").is_err());
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let mut config = HighlightConfig::default();
    config.theme = "base16-mocha.dark".to_string();
    config.format = OutputFormat::ClassedHtml;
    config.buffer.max_doublings = 5;

    config.save_to(&path).unwrap();
    let loaded = HighlightConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_from_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = HighlightConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.yaml"));
}
