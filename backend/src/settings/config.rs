//! Server settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::persistence::{
    DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DEFAULT_TIMEOUT_SECS, PoolConfig,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RECONCILE_ON_STARTUP: bool = true;
const DEFAULT_SEED_ON_EMPTY: bool = false;

/// Environment variable consulted when no database URL is configured.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// The store connection string could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseUrlError {
    #[error("database URL missing: set --database-url, TEAHOUSE_DATABASE_URL or DATABASE_URL")]
    Missing,
    #[error("database URL must not be empty")]
    Empty,
}

/// Settings for the HTTP server and its startup maintenance.
///
/// Values come from `--flags`, `TEAHOUSE_*` environment variables, and the
/// `.teahouse.toml` configuration file.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TEAHOUSE")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_idle_connections: Option<u32>,
    /// Pool checkout timeout in seconds.
    pub connection_timeout_secs: Option<u64>,
    /// Collapse duplicate users before serving.
    pub reconcile_on_startup: Option<bool>,
    /// Insert the sample teas when the catalogue is empty.
    pub seed_on_empty: Option<bool>,
    /// Single origin allowed by CORS. Any origin is allowed when unset.
    pub allowed_origin: Option<String>,
}

impl ServerSettings {
    /// Interface to bind, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Port to bind, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Whether the duplicate-user sweep runs before serving; on by default.
    pub fn reconcile_on_startup(&self) -> bool {
        self.reconcile_on_startup.unwrap_or(DEFAULT_RECONCILE_ON_STARTUP)
    }

    /// Whether an empty catalogue is seeded with the sample teas.
    pub fn seed_on_empty(&self) -> bool {
        self.seed_on_empty.unwrap_or(DEFAULT_SEED_ON_EMPTY)
    }

    /// Resolve the connection string, consulting `DATABASE_URL` last.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseUrlError`] when no source provides a non-empty URL.
    pub fn database_url(&self) -> Result<String, DatabaseUrlError> {
        resolve_database_url(
            self.database_url.as_deref(),
            std::env::var(DATABASE_URL_ENV).ok(),
        )
    }

    /// Pool settings for `database_url`.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.max_connections.unwrap_or(DEFAULT_MAX_SIZE))
            .with_min_idle(Some(self.min_idle_connections.unwrap_or(DEFAULT_MIN_IDLE)))
            .with_connection_timeout(Duration::from_secs(
                self.connection_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
    }
}

/// Pick the configured URL, else the fallback, rejecting blank values.
///
/// # Errors
///
/// Returns [`DatabaseUrlError::Missing`] when neither value is present and
/// [`DatabaseUrlError::Empty`] when the chosen value is blank.
pub fn resolve_database_url(
    configured: Option<&str>,
    fallback: Option<String>,
) -> Result<String, DatabaseUrlError> {
    let url = match configured {
        Some(value) => value.to_owned(),
        None => fallback.ok_or(DatabaseUrlError::Missing)?,
    };
    if url.trim().is_empty() {
        return Err(DatabaseUrlError::Empty);
    }
    Ok(url)
}
