//! Application configuration module
//!
//! Configuration is layered: built-in defaults, then an optional TOML file
//! named by `KANFLOW_CONFIG`, then individual environment variables.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_CONFIG_FILE: &str = "KANFLOW_CONFIG";
pub const ENV_BIND_ADDR: &str = "KANFLOW_BIND_ADDR";
pub const ENV_SEND_TIMEOUT_MS: &str = "KANFLOW_SEND_TIMEOUT_MS";
pub const ENV_CONNECTION_BUFFER: &str = "KANFLOW_CONNECTION_BUFFER";
pub const ENV_IDENTITY_HEADER: &str = "KANFLOW_IDENTITY_HEADER";
pub const ENV_LOG_FILTER: &str = "RUST_LOG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SEND_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_CONNECTION_BUFFER: usize = 64;
const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";
const DEFAULT_LOG_FILTER: &str = "info";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Upper bound on a single event send before the connection is pruned
    pub send_timeout: Duration,
    /// Events buffered per connection before sends start to wait
    pub connection_buffer: usize,
    /// Header carrying the user id set by the authenticating proxy
    pub identity_header: String,
    /// `tracing_subscriber` filter directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            send_timeout: Duration::from_millis(DEFAULT_SEND_TIMEOUT_MS),
            connection_buffer: DEFAULT_CONNECTION_BUFFER,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// On-disk shape of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<String>,
    send_timeout_ms: Option<u64>,
    connection_buffer: Option<usize>,
    identity_header: Option<String>,
    log_filter: Option<String>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the process environment, reading the file named by
    /// `KANFLOW_CONFIG` first if it is set.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::load`] with an injectable variable lookup.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut builder = match lookup(ENV_CONFIG_FILE) {
            Some(path) => AppConfigBuilder::from_file(Path::new(&path))?,
            None => AppConfig::builder(),
        };

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            builder = builder.bind_addr(addr);
        }
        if let Some(raw) = lookup(ENV_SEND_TIMEOUT_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber(ENV_SEND_TIMEOUT_MS, raw.clone()))?;
            builder = builder.send_timeout(Duration::from_millis(ms));
        }
        if let Some(raw) = lookup(ENV_CONNECTION_BUFFER) {
            let size = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber(ENV_CONNECTION_BUFFER, raw.clone()))?;
            builder = builder.connection_buffer(size);
        }
        if let Some(header) = lookup(ENV_IDENTITY_HEADER) {
            builder = builder.identity_header(header);
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            builder = builder.log_filter(filter);
        }

        builder.build()
    }

    /// Parsed bind address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.bind_addr.clone()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        if self.send_timeout.is_zero() {
            return Err(ConfigError::MissingValue("send_timeout"));
        }
        if self.connection_buffer == 0 {
            return Err(ConfigError::MissingValue("connection_buffer"));
        }
        if self.identity_header.trim().is_empty() {
            return Err(ConfigError::MissingValue("identity_header"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    bind_addr: Option<String>,
    send_timeout: Option<Duration>,
    connection_buffer: Option<usize>,
    identity_header: Option<String>,
    log_filter: Option<String>,
}

impl AppConfigBuilder {
    /// Seed a builder from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(source)?;
        Ok(Self {
            bind_addr: file.bind_addr,
            send_timeout: file.send_timeout_ms.map(Duration::from_millis),
            connection_buffer: file.connection_buffer,
            identity_header: file.identity_header,
            log_filter: file.log_filter,
        })
    }

    /// Seed a builder from a TOML file on disk
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&source)
    }

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    pub fn connection_buffer(mut self, size: usize) -> Self {
        self.connection_buffer = Some(size);
        self
    }

    pub fn identity_header(mut self, header: impl Into<String>) -> Self {
        self.identity_header = Some(header.into());
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            bind_addr: self.bind_addr.unwrap_or(defaults.bind_addr),
            send_timeout: self.send_timeout.unwrap_or(defaults.send_timeout),
            connection_buffer: self.connection_buffer.unwrap_or(defaults.connection_buffer),
            identity_header: self
                .identity_header
                .map(|h| h.trim().to_ascii_lowercase())
                .unwrap_or(defaults.identity_header),
            log_filter: self.log_filter.unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address: {0}")]
    InvalidAddress(String),
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(&'static str, String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file {0}: {1}")]
    Io(String, String),
    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
}
