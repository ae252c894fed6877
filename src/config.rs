//! Configuration System
//!
//! Handles loading configuration from TOML files and environment variables.
//! Every section has serde defaults, so a missing or empty file still yields
//! a runnable service.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::telemetry::HubConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub hub: HubSettings,

    #[serde(default)]
    pub ingress: IngressConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Capacity of each WebSocket connection's outbound queue
    #[serde(default = "default_ws_outbound_capacity")]
    pub ws_outbound_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_ws_outbound_capacity() -> usize {
    64
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ws_outbound_capacity: default_ws_outbound_capacity(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Distribution hub settings
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    #[serde(default = "default_max_subscribers")]
    pub max_subscribers: usize,

    /// Per-subscriber delivery time budget in milliseconds
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

fn default_max_subscribers() -> usize {
    1000
}

fn default_delivery_timeout_ms() -> u64 {
    500
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            max_subscribers: default_max_subscribers(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

impl HubSettings {
    /// Convert to the hub's runtime configuration
    pub fn to_hub_config(&self) -> HubConfig {
        HubConfig {
            max_subscribers: self.max_subscribers,
            delivery_timeout: Duration::from_millis(self.delivery_timeout_ms),
        }
    }
}

/// Telemetry source backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Simulated flight controller (development, SITL-style testing)
    Sim,
    /// Unix domain socket reading newline-delimited JSON frames
    Socket,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Sim => write!(f, "sim"),
            Backend::Socket => write!(f, "socket"),
        }
    }
}

/// Ingress backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngressConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Path of the telemetry socket (socket backend)
    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Delay before reconnecting after a lost socket connection
    #[serde(default = "default_reconnect_secs")]
    pub reconnect_secs: u64,

    /// Sample generation rate in Hz (sim backend)
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,
}

fn default_backend() -> Backend {
    Backend::Sim
}

fn default_socket_path() -> String {
    "/tmp/helios-telemetry.sock".to_string()
}

fn default_reconnect_secs() -> u64 {
    2
}

fn default_sample_rate_hz() -> f64 {
    10.0
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            socket_path: default_socket_path(),
            reconnect_secs: default_reconnect_secs(),
            sample_rate_hz: default_sample_rate_hz(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HELIOS_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("HELIOS_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(backend) = std::env::var("HELIOS_BACKEND") {
            match backend.to_lowercase().as_str() {
                "sim" => self.ingress.backend = Backend::Sim,
                "socket" => self.ingress.backend = Backend::Socket,
                other => {
                    tracing::warn!(backend = %other, "Unknown HELIOS_BACKEND, keeping configured value")
                }
            }
        }
        if let Ok(path) = std::env::var("HELIOS_SOCKET_PATH") {
            self.ingress.socket_path = path;
        }
        if let Ok(rate) = std::env::var("HELIOS_SAMPLE_RATE_HZ") {
            if let Ok(r) = rate.parse() {
                self.ingress.sample_rate_hz = r;
            }
        }

        if let Ok(level) = std::env::var("HELIOS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HELIOS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}
