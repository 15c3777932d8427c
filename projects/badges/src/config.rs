//! Runtime settings, read from the environment (and `.env` via dotenvy).
//!
//! - `GITHUB_TOKEN`: bearer token for authenticated upstreams
//! - `BADGES_ADDR`: listen address, `0.0.0.0:8000` by default
//! - `BADGES_LOG` / `BADGES_LOG_FORMAT`: tracing filter and `compact|pretty`
//! - `BADGES_CATALOG`: TOML file replacing the built-in badges
//! - `BADGES_COUNTER_HOST`, `BADGES_COUNTER_PREFIX`, `BADGES_GITHUB_API`, `BADGES_GITHUB_WEB`, `BADGES_OWNER`,
//!   `BADGES_REPOSITORY`, `BADGES_PACKAGE`: where the built-in badges point

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use utils_trace::LogFormat;

use crate::catalog::{Catalog, Endpoints};

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_LOG: &str = "info";

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
    pub github_token: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("InvalidAddr: {value}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("InvalidLogFormat: {source}")]
    InvalidLogFormat {
        #[from]
        source: utils_trace::TracingInitError,
    },

    #[error("ReadCatalog: {path:?}: {source}")]
    ReadCatalog {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ParseCatalog: {path:?}: {source}")]
    ParseCatalog {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr_value = non_empty("BADGES_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|source| SettingsError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let log_format = match non_empty("BADGES_LOG_FORMAT") {
            Some(value) => value.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            counter_host: non_empty("BADGES_COUNTER_HOST").unwrap_or(defaults.counter_host),
            counter_prefix: non_empty("BADGES_COUNTER_PREFIX").unwrap_or(defaults.counter_prefix),
            github_api: non_empty("BADGES_GITHUB_API").unwrap_or(defaults.github_api),
            github_web: non_empty("BADGES_GITHUB_WEB").unwrap_or(defaults.github_web),
            owner: non_empty("BADGES_OWNER").unwrap_or(defaults.owner),
            repository: non_empty("BADGES_REPOSITORY").unwrap_or(defaults.repository),
            package: non_empty("BADGES_PACKAGE").unwrap_or(defaults.package),
        };

        Ok(Self {
            addr,
            log_level: non_empty("BADGES_LOG").unwrap_or_else(|| DEFAULT_LOG.to_string()),
            log_format,
            github_token: non_empty("GITHUB_TOKEN"),
            catalog_path: non_empty("BADGES_CATALOG").map(PathBuf::from),
            endpoints,
        })
    }

    /// The configured catalog file, or the built-in badges when none is set.
    pub fn load_catalog(&self) -> Result<Catalog, SettingsError> {
        let Some(path) = &self.catalog_path else {
            return Ok(Catalog::builtin(&self.endpoints));
        };

        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::ReadCatalog {
            path: path.clone(),
            source,
        })?;
        let catalog: Catalog = toml::from_str(&raw).map_err(|source| SettingsError::ParseCatalog {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), badges = catalog.badges.len(), "loaded badge catalog");
        Ok(catalog)
    }
}
