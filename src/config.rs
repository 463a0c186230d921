// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`ServerConfig`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `DATA_DIR` | Directory holding the redb database file | `./data` |
//! | `JWT_SECRET` | Access token signing secret | Required |
//! | `STORE_TIMEOUT_MS` | Upper bound for each store call | `5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `qtmap_server=info,tower_http=debug` |

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The accounts/settings database lives at `$DATA_DIR/qtmap.redb`.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the token signing secret.
///
/// Must be provisioned by the deployment's secret store; there is no
/// built-in fallback.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub const STORE_TIMEOUT_MS_ENV: &str = "STORE_TIMEOUT_MS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "qtmap_server=info,tower_http=debug";

/// Database file name inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "qtmap.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: Vec<u8>,
    pub store_timeout: Duration,
    pub log_format: LogFormat,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("store_timeout", &self.store_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn invalid(name: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { name, value }
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup(HOST_ENV) {
            Some(raw) => raw.parse().map_err(|_| invalid(HOST_ENV, raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| invalid(PORT_ENV, raw))?,
            None => DEFAULT_PORT,
        };

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let jwt_secret = lookup(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;
        if jwt_secret.is_empty() {
            return Err(invalid(JWT_SECRET_ENV, String::new()));
        }

        let store_timeout_ms = match lookup(STORE_TIMEOUT_MS_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => ms,
                _ => return Err(invalid(STORE_TIMEOUT_MS_ENV, raw)),
            },
            None => DEFAULT_STORE_TIMEOUT_MS,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(invalid(LOG_FORMAT_ENV, other.to_string())),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            jwt_secret: jwt_secret.into_bytes(),
            store_timeout: Duration::from_millis(store_timeout_ms),
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("./data").join("qtmap.redb"));
        assert_eq!(config.jwt_secret, b"s3cret");
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            (JWT_SECRET_ENV, "s3cret"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8080"),
            (DATA_DIR_ENV, "/var/lib/qtmap"),
            (STORE_TIMEOUT_MS_ENV, "250"),
            (LOG_FORMAT_ENV, "json"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/qtmap/qtmap.redb"));
        assert_eq!(config.store_timeout, Duration::from_millis(250));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(JWT_SECRET_ENV))));
        assert!(matches!(
            load(&[(JWT_SECRET_ENV, "")]),
            Err(ConfigError::Invalid { name: JWT_SECRET_ENV, .. })
        ));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for (name, value) in [
            (PORT_ENV, "http"),
            (HOST_ENV, "not-an-ip"),
            (STORE_TIMEOUT_MS_ENV, "0"),
            (LOG_FORMAT_ENV, "xml"),
        ] {
            let err = load(&[(JWT_SECRET_ENV, "s3cret"), (name, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { name: n, .. } if n == name));
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let config = load(&[(JWT_SECRET_ENV, "s3cret")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("<redacted>"));
    }
}
