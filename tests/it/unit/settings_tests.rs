//! Unit tests for loading and saving settings files.

use plotcore::Settings;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let settings = Settings {
        dev: true,
        slow_stage_ms: 5.0,
        ..Settings::default()
    };
    settings.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.text_font(), "Bokeh");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"default_font": "courier"}"#).unwrap();

    let loaded = Settings::load(&path).unwrap();
    assert_eq!(loaded.text_font(), "courier");
    assert_eq!(loaded.hatch_scale, Settings::default().hatch_scale);
    assert!(!loaded.dev);
}

#[test]
fn test_invalid_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "not json").unwrap();

    let err = Settings::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("settings.json"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(Settings::load(&dir.path().join("absent.json")).is_err());
}
