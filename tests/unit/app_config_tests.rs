/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::fs;
use std::time::Duration;

use linguaflow::app_config::{Config, LogLevel};

/// Test default configuration values
#[test]
fn test_default_config_withNoChanges_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "tr");
    assert_eq!(config.auto_detect_fallback, "en");
    assert_eq!(config.provider.endpoint, "https://api.mymemory.translated.net/get");
    assert_eq!(config.provider.timeout(), Duration::from_secs(10));
    assert_eq!(config.debounce(), Duration::from_millis(600));
    assert_eq!(config.history_limit, 200);
    assert_eq!(config.storage_path, None);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// A missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "tr");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.debounce_ms, config.debounce_ms);
    Ok(())
}

/// Fields absent from the file fall back to defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("conf.json");
    fs::write(
        &path,
        r#"{ "target_language": "fr", "provider": { "email": "me@example.com" }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.provider.email.as_deref(), Some("me@example.com"));
    assert_eq!(config.provider.timeout_secs, 10);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.history_limit, 200);
    Ok(())
}

#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("conf.json");
    fs::write(&path, "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test configuration validation
#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.target_language = "auto".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.debounce_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.history_limit = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.provider.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_save_withCustomValues_shouldRoundTrip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.storage_path = Some(dir.path().join("history.db"));
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.source_language, "en");
    assert_eq!(loaded.storage_path, config.storage_path);
    Ok(())
}
