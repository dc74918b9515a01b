//! Service configuration read from the environment.
//!
//! `main` loads an optional `.env` file first, so every variable below can be
//! set there as well:
//!
//! | Variable               | Default                  |
//! |------------------------|--------------------------|
//! | `AUDIT_HOST`           | `127.0.0.1`              |
//! | `AUDIT_PORT`           | `8080`                   |
//! | `AUDIT_DB_PATH`        | `audits.sqlite`          |
//! | `AUDIT_JSON_LIMIT`     | `10485760` bytes         |
//! | `AUDIT_SNAPSHOT_LIMIT` | 8 × `AUDIT_JSON_LIMIT`   |
//! | `AUDIT_ADMIN`          | `true`                   |
//!
//! The snapshot limit caps imported snapshot documents. It must be at least
//! three times the JSON limit, because the photos of an audit may fill it up
//! to `snapshot_limit - json_limit` encoded bytes and a single upload of
//! `json_limit` raw bytes grows by a third when base64-encoded.

use common::audit::capture::Capabilities;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid value `{value}` for {key}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// SQLite file holding the template documents.
    pub db_path: PathBuf,
    /// Upper bound for JSON bodies and for each uploaded photo.
    pub json_limit: usize,
    /// Upper bound for imported snapshot documents.
    pub snapshot_limit: usize,
    /// Grants structure editing and template saving.
    pub admin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            db_path: PathBuf::from("audits.sqlite"),
            json_limit: 10 * 1024 * 1024,
            snapshot_limit: 80 * 1024 * 1024,
            admin: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let json_limit = parse(&lookup, "AUDIT_JSON_LIMIT")?.unwrap_or(defaults.json_limit);
        let snapshot_limit = parse(&lookup, "AUDIT_SNAPSHOT_LIMIT")?
            .unwrap_or_else(|| json_limit.saturating_mul(8));
        if snapshot_limit / 3 < json_limit {
            return Err(ConfigError {
                key: "AUDIT_SNAPSHOT_LIMIT",
                value: snapshot_limit.to_string(),
            });
        }
        Ok(Self {
            host: lookup("AUDIT_HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "AUDIT_PORT")?.unwrap_or(defaults.port),
            db_path: lookup("AUDIT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            json_limit,
            snapshot_limit,
            admin: parse(&lookup, "AUDIT_ADMIN")?.unwrap_or(defaults.admin),
        })
    }

    /// Encoded photo bytes one audit may hold, leaving `json_limit` of the
    /// snapshot limit for the instance document itself.
    pub fn image_budget(&self) -> usize {
        self.snapshot_limit.saturating_sub(self.json_limit)
    }

    pub fn capabilities(&self) -> Capabilities {
        if self.admin {
            Capabilities::admin()
        } else {
            Capabilities::answering()
        }
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { key, value }),
    }
}
