//! Integration tests for configuration loading

use pipmirror_core::config::{sample_config, ConfigFile, MirrorConfig};
use std::time::Duration;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let config = ConfigFile::load_from(dir.path().join("absent.toml")).expect("Should load");
    assert_eq!(config, ConfigFile::default());
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ConfigFile::default();
    config.capture.frame_rate = 60;
    config.catalog.desktop_owner_apps = vec!["Dock".to_string()];
    config.save_to(&path).expect("Should save");

    let loaded = ConfigFile::load_from(&path).expect("Should load");
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[capture]\nstart_timeout_ms = 0\n").expect("Should write");

    let config = ConfigFile::load_from(&path).expect("Should load");
    let resolved = MirrorConfig::from(&config);

    assert_eq!(resolved.start_timeout, None);
    assert_eq!(resolved.frame_rate, 30);
    assert_eq!(resolved.min_window_height, 48.0);
}

#[test]
fn test_invalid_frame_rate_rejected() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[capture]\nframe_rate = 0\n").expect("Should write");

    let err = tokio_test::assert_err!(ConfigFile::load_from(&path));
    assert!(err.to_string().contains("frame_rate"));
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[capture\n").expect("Should write");

    let err = ConfigFile::load_from(&path).expect_err("Should reject");
    assert!(err.user_hint().unwrap_or_default().contains("config.toml"));
}

#[test]
fn test_sample_resolves_to_defaults() {
    let config: ConfigFile = toml::from_str(&sample_config()).expect("Sample should parse");
    let resolved = config.resolve();
    assert_eq!(resolved, MirrorConfig::default());
    assert_eq!(resolved.start_timeout, Some(Duration::from_secs(5)));
}
