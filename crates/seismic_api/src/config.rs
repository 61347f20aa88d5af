//! Server configuration resolved from the process environment.
//!
//! # Invariants
//! - Blank variables fall back to defaults.
//! - An unparseable bind address is an error, never silently replaced.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SEISMIC_DB_PATH";
pub const BIND_ADDR_VAR: &str = "SEISMIC_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "SEISMIC_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "SEISMIC_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "seismic.sqlite3";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` logs to stderr.
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr { value: String, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBindAddr { value, reason } => {
                write!(f, "invalid {BIND_ADDR_VAR} `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let bind_addr = parse_bind_addr(
            value(BIND_ADDR_VAR)
                .as_deref()
                .unwrap_or(DEFAULT_BIND_ADDR),
        )?;
        let db_path = value(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = value(LOG_LEVEL_VAR)
            .unwrap_or_else(|| seismic_core::default_log_level().to_string());

        Ok(Self {
            bind_addr,
            db_path,
            log_level,
            log_dir: value(LOG_DIR_VAR),
        })
    }
}

/// Parses a `host:port` socket address.
pub fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddr {
            value: raw.to_string(),
            reason: err.to_string(),
        })
}
