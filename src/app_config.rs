use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or `auto`
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Source language sent to the provider when `auto` is selected
    #[serde(default = "default_auto_detect_fallback")]
    pub auto_detect_fallback: String,

    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Quiet period before an input change triggers a translation
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum entries kept in history and in favorites
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// SQLite file for history/favorites; platform data dir when unset
    #[serde(default)]
    pub storage_path: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Contact email, raises the provider's free daily quota
    #[serde(default)]
    pub email: Option<String>,
}

impl ProviderConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            email: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    language_utils::AUTO_DETECT.to_string()
}

fn default_target_language() -> String {
    "tr".to_string()
}

fn default_auto_detect_fallback() -> String {
    // MyMemory rejects "auto"; English is the most common source
    "en".to_string()
}

fn default_endpoint() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    600
}

fn default_history_limit() -> usize {
    200
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file is created with default values.
    pub fn load_or_create<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let file = File::open(config_path)
                .with_context(|| format!("Failed to open config file: {:?}", config_path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", config_path);

        let config = Config::default();
        config.save(config_path)?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(config_path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", config_path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !language_utils::is_auto_detect(&self.source_language) {
            language_utils::validate_language_code(&self.source_language)
                .context("Invalid source language")?;
        }

        if language_utils::is_auto_detect(&self.target_language) {
            return Err(anyhow!("Target language cannot be auto-detect"));
        }
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        language_utils::validate_language_code(&self.auto_detect_fallback)
            .context("Invalid auto-detect fallback language")?;

        Url::parse(&self.provider.endpoint)
            .with_context(|| format!("Invalid provider endpoint: {}", self.provider.endpoint))?;

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be greater than zero"));
        }

        if self.debounce_ms == 0 {
            return Err(anyhow!("Debounce interval must be greater than zero"));
        }

        if self.history_limit == 0 {
            return Err(anyhow!("History limit must be greater than zero"));
        }

        Ok(())
    }

    /// Debounce quiet period as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            auto_detect_fallback: default_auto_detect_fallback(),
            provider: ProviderConfig::default(),
            debounce_ms: default_debounce_ms(),
            history_limit: default_history_limit(),
            storage_path: None,
            log_level: LogLevel::default(),
        }
    }
}
