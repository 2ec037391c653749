//! Process configuration, read from command-line flags with environment
//! variable fallbacks.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use crate::store::{Models, StoreError};

/// Default cap on request body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_048_576;

/// Deployment environment, reported by the healthcheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which [`MovieStore`](crate::store::MovieStore) backend to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// Volatile, process-local storage.
    #[default]
    Memory,
    /// SQLite database file at `--db-path`.
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// movies-api - JSON movie catalog server
#[derive(Debug, Clone, Parser)]
#[command(name = "movies-api", version, about, long_about = None)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "MOVIES_PORT", default_value_t = 4000)]
    pub port: u16,

    /// Deployment environment
    #[arg(long, env = "MOVIES_ENV", value_enum, default_value_t = Environment::Development)]
    pub env: Environment,

    /// Storage backend
    #[arg(long, env = "MOVIES_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Path to the SQLite database file (used with `--store sqlite`)
    #[arg(long, env = "MOVIES_DB_PATH", default_value = "movies.db")]
    pub db_path: PathBuf,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "MOVIES_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[arg(long, env = "MOVIES_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            env: Environment::default(),
            store: StoreKind::default(),
            db_path: PathBuf::from("movies.db"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Address the server binds to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Build the configured store backend.
    pub fn open_models(&self) -> Result<Models, StoreError> {
        match self.store {
            StoreKind::Memory => {
                info!("using in-memory movie store");
                Ok(Models::in_memory())
            }
            #[cfg(feature = "sqlite")]
            StoreKind::Sqlite => {
                info!(path = %self.db_path.display(), "using sqlite movie store");
                Models::sqlite(&self.db_path)
            }
            #[cfg(not(feature = "sqlite"))]
            StoreKind::Sqlite => Err(StoreError::Persistence(
                "sqlite support was not compiled in".into(),
            )),
        }
    }
}
