//! Configuration data model.
//!
//! All structs derive `Serialize`/`Deserialize` for TOML persistence.
//! Every field has a default so the client runs without a config file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Display and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page_size_options")]
    pub page_size_options: Vec<u32>,
    /// How long a notification stays on screen.
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            page_size_options: default_page_size_options(),
            notification_ms: default_notification_ms(),
            tick_ms: default_tick_ms(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Where the session (token + profile) is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides `<data_dir>/bookshelf/storage.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(p) => super::expand_home(&p.to_string_lossy()),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bookshelf")
                .join("storage.json"),
        }
    }
}

/// Diagnostic logging. The terminal belongs to the UI, so logs go to files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: default_log_dir(),
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "https://mern-stack-assessment-backend.onrender.com/api".to_string()
}
fn default_page_size() -> u32 {
    5
}
fn default_page_size_options() -> Vec<u32> {
    vec![5, 10, 25]
}
fn default_notification_ms() -> u64 {
    2000
}
fn default_tick_ms() -> u64 {
    50
}
fn default_timestamp_format() -> String {
    "%H:%M:%S".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_dir() -> String {
    "~/.local/share/bookshelf/logs".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://localhost:5000/api"

            [ui]
            page_size = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:5000/api");
        assert_eq!(cfg.ui.page_size, 10);
        assert_eq!(cfg.ui.notification_ms, 2000);
        assert!(cfg.logging.enabled);
        assert!(cfg.storage.path.is_none());
    }

    #[test]
    fn explicit_storage_path_wins() {
        let cfg = StorageConfig {
            path: Some(PathBuf::from("/tmp/bookshelf/session.json")),
        };
        assert_eq!(cfg.resolved_path(), PathBuf::from("/tmp/bookshelf/session.json"));
    }
}
