//! Application configuration management.
//!
//! Configuration comes from a JSON file at
//! `~/.config/studentdesk/config.json`, with environment variables
//! (optionally loaded from a `.env` file by the binary) taking precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::utils::DateStyle;

/// Application name used for config/log directory paths
pub const APP_NAME: &str = "studentdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable holding the student store base URL
pub const ENV_BASE_URL: &str = "STUDENT_API_BASE_URL";

/// Environment variable holding the birth date display locale
pub const ENV_DATE_LOCALE: &str = "STUDENT_DATE_LOCALE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub date_locale: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_DATE_LOCALE).ok(),
        );
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Non-empty values win over what the file provided.
    pub fn apply_overrides(&mut self, base_url: Option<String>, date_locale: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(locale) = date_locale.filter(|l| !l.trim().is_empty()) {
            self.date_locale = Some(locale);
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the log file.
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn base_url(&self) -> Result<&str> {
        self.api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No student store configured. Set {} or api_base_url in {}",
                    ENV_BASE_URL,
                    CONFIG_FILE
                )
            })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Display style for birth dates; unknown locales fall back to the default.
    pub fn date_style(&self) -> DateStyle {
        match self.date_locale.as_deref() {
            None => DateStyle::default(),
            Some(tag) => DateStyle::from_locale(tag).unwrap_or_else(|| {
                warn!(locale = tag, "Unknown date locale, using default");
                DateStyle::default()
            }),
        }
    }
}
