//! Service configuration read from the environment (and `.env`, via dotenvy).
//!
//! Required: `DATABASE_URL`, `API_KEY`.
//! Optional: `APP_HOST` (0.0.0.0), `APP_PORT` (8080), `SAVE_DIR` (./storage/photos),
//! `PHOTO_URL_PREFIX` (/photos), `DB_MAX_CONNECTIONS` (10), `MAX_UPLOAD_BYTES` (10 MiB),
//! `LOG_LEVEL` (info), `LOG_FORMAT` (pretty | json).

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use thiserror::Error;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    /// Root directory for uploaded photos.
    pub save_dir: PathBuf,
    /// Public URL prefix under which `save_dir` is served.
    pub photo_url_prefix: String,
    pub api_key: String,
    pub max_upload_bytes: usize,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load from the process environment after reading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(key))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            host: parse_or(&lookup, "APP_HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&lookup, "APP_PORT", 8080)?,
            save_dir: lookup("SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./storage/photos")),
            photo_url_prefix: lookup("PHOTO_URL_PREFIX").unwrap_or_else(|| "/photos".to_string()),
            api_key: required("API_KEY")?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            logging: LoggingConfig {
                level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default())?,
            },
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(key, raw)),
        None => Ok(default),
    }
}
