use std::fs;
use std::path::Path;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use pricewatch_client::ClientSettings;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "pricewatch.ron";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Application settings, read from `pricewatch.ron` next to the binary's
/// working directory. Missing fields fall back to their defaults, and the
/// `PRICEWATCH_API_URL` environment variable overrides the base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval_ms: 2000,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
        }
    }
}

impl AppConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

pub fn load(dir: &Path) -> AppConfig {
    let path = dir.join(CONFIG_FILENAME);
    let config = match fs::read_to_string(&path) {
        Ok(content) => match ron::from_str(&content) {
            Ok(config) => {
                client_info!("Loaded configuration from {:?}", path);
                config
            }
            Err(err) => {
                client_warn!("Failed to parse configuration {:?}: {}", path, err);
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(err) => {
            client_warn!("Failed to read configuration {:?}: {}", path, err);
            AppConfig::default()
        }
    };
    apply_env(config)
}

fn apply_env(mut config: AppConfig) -> AppConfig {
    if let Ok(url) = std::env::var("PRICEWATCH_API_URL") {
        if !url.is_empty() {
            config.api_base_url = url;
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.poll_interval_ms, 2000);
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_fields() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "(api_base_url: \"http://scraper.internal:8000\")",
        )
        .unwrap();

        let config = load(dir.path());
        assert_eq!(config.api_base_url, "http://scraper.internal:8000");
        assert_eq!(config.request_timeout_ms, 30_000);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "not ron at all").unwrap();

        let config = load(dir.path());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn settings_convert_to_durations() {
        let config = AppConfig {
            poll_interval_ms: 500,
            ..AppConfig::default()
        };
        let settings = config.client_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }
}
