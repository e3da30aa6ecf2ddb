//! Configuration management
//!
//! Configuration is loaded from:
//! - config.yml file
//! - Environment variables prefixed with `EMERGENCY_HUB_` (override file settings)
//!
//! Missing optional values are filled with sensible defaults, so an absent or
//! empty file yields a runnable configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::fixtures::DEFAULT_SHARED_PASSWORD;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Relay HTTP server
    #[serde(default)]
    pub server: ServerConfig,
    /// Key-value storage backing the session and profiles
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication variant
    #[serde(default)]
    pub auth: AuthConfig,
    /// Simulated network latency of store operations
    #[serde(default)]
    pub latency: LatencyConfig,
    /// Outbound report submission
    #[serde(default)]
    pub relay: RelayConfig,
    /// SMTP settings used by the relay
    #[serde(default)]
    pub mail: MailConfig,
    /// Third-party news feed
    #[serde(default)]
    pub news: NewsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub driver: StorageDriver,
    /// Directory used by the file driver
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            driver: StorageDriver::default(),
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/storage")
}

/// Storage driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    /// One JSON file per key (default)
    #[default]
    File,
    /// Process memory, lost on restart
    Memory,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub variant: AuthVariantKind,
    /// Password accepted by every user in the fixture variant
    #[serde(default = "default_shared_password")]
    pub shared_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            variant: AuthVariantKind::default(),
            shared_password: default_shared_password(),
        }
    }
}

fn default_shared_password() -> String {
    DEFAULT_SHARED_PASSWORD.to_string()
}

/// Where users come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthVariantKind {
    /// Users register themselves; the user list is persisted (default)
    #[default]
    Registered,
    /// Fixed fixture users sharing one password
    Fixture,
}

/// Simulated latency, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_auth_ms")]
    pub auth_ms: u64,
    #[serde(default = "default_fetch_ms")]
    pub alerts_ms: u64,
    #[serde(default = "default_fetch_ms")]
    pub reports_ms: u64,
    #[serde(default = "default_categories_ms")]
    pub categories_ms: u64,
    #[serde(default = "default_fetch_ms")]
    pub guidelines_ms: u64,
    #[serde(default = "default_auth_ms")]
    pub profile_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            auth_ms: default_auth_ms(),
            alerts_ms: default_fetch_ms(),
            reports_ms: default_fetch_ms(),
            categories_ms: default_categories_ms(),
            guidelines_ms: default_fetch_ms(),
            profile_ms: default_auth_ms(),
        }
    }
}

impl LatencyConfig {
    /// No simulated delays at all
    pub fn none() -> Self {
        Self {
            auth_ms: 0,
            alerts_ms: 0,
            reports_ms: 0,
            categories_ms: 0,
            guidelines_ms: 0,
            profile_ms: 0,
        }
    }
}

fn default_auth_ms() -> u64 {
    1000
}

fn default_fetch_ms() -> u64 {
    800
}

fn default_categories_ms() -> u64 {
    600
}

/// Outbound report submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Relay URL. Reports stay local when unset.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Bearer token sent by the submitter and required by the relay server
    #[serde(default)]
    pub anon_key: Option<String>,
}

/// SMTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_from")]
    pub from: String,
    /// Responders receiving every report
    #[serde(default)]
    pub to: Vec<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from: default_from(),
            to: Vec::new(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "Emergency Response <noreply@localhost>".to_string()
}

/// News feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_news_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_keywords")]
    pub keywords: String,
    #[serde(default = "default_news_interval")]
    pub interval_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_news_url(),
            api_key: String::new(),
            country: default_country(),
            lang: default_lang(),
            keywords: default_keywords(),
            interval_secs: default_news_interval(),
        }
    }
}

impl NewsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

fn default_news_url() -> String {
    "https://gnews.io/api/v4/search".to_string()
}

fn default_country() -> String {
    "ng".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_keywords() -> String {
    "emergency OR flood OR fire OR accident".to_string()
}

fn default_news_interval() -> u64 {
    300
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: format_yaml_error(&e),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Recognized variables:
    /// - EMERGENCY_HUB_SERVER_HOST, EMERGENCY_HUB_SERVER_PORT
    /// - EMERGENCY_HUB_STORAGE_DRIVER, EMERGENCY_HUB_STORAGE_PATH
    /// - EMERGENCY_HUB_AUTH_VARIANT
    /// - EMERGENCY_HUB_RELAY_ENDPOINT, EMERGENCY_HUB_RELAY_ANON_KEY
    /// - EMERGENCY_HUB_SMTP_HOST, EMERGENCY_HUB_SMTP_PORT,
    ///   EMERGENCY_HUB_SMTP_USERNAME, EMERGENCY_HUB_SMTP_PASSWORD
    /// - EMERGENCY_HUB_NEWS_API_KEY
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("EMERGENCY_HUB_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("EMERGENCY_HUB_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(driver) = std::env::var("EMERGENCY_HUB_STORAGE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "file" => self.storage.driver = StorageDriver::File,
                "memory" => self.storage.driver = StorageDriver::Memory,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(path) = std::env::var("EMERGENCY_HUB_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(variant) = std::env::var("EMERGENCY_HUB_AUTH_VARIANT") {
            match variant.to_lowercase().as_str() {
                "registered" => self.auth.variant = AuthVariantKind::Registered,
                "fixture" => self.auth.variant = AuthVariantKind::Fixture,
                _ => {}
            }
        }

        if let Ok(endpoint) = std::env::var("EMERGENCY_HUB_RELAY_ENDPOINT") {
            self.relay.endpoint = Some(endpoint);
        }
        if let Ok(key) = std::env::var("EMERGENCY_HUB_RELAY_ANON_KEY") {
            self.relay.anon_key = Some(key);
        }

        if let Ok(host) = std::env::var("EMERGENCY_HUB_SMTP_HOST") {
            self.mail.smtp_host = host;
        }
        if let Ok(port) = std::env::var("EMERGENCY_HUB_SMTP_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.mail.smtp_port = port;
            }
        }
        if let Ok(username) = std::env::var("EMERGENCY_HUB_SMTP_USERNAME") {
            self.mail.smtp_username = Some(username);
        }
        if let Ok(password) = std::env::var("EMERGENCY_HUB_SMTP_PASSWORD") {
            self.mail.smtp_password = Some(password);
        }

        if let Ok(key) = std::env::var("EMERGENCY_HUB_NEWS_API_KEY") {
            self.news.api_key = key;
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!("at line {}, column {}: {}", location.line(), location.column(), e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
