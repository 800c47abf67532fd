//! Server configuration read from the environment.
//!
//! Variables:
//! - `CAREPOINT_STORE`: `sqlite` (default) or `memory`
//! - `CAREPOINT_DB_PATH`: SQLite database file path (default: "carepoint.db")
//! - `CAREPOINT_SNAPSHOT_PATH`: snapshot file for the memory store (optional)
//! - `CAREPOINT_PORT`: listen port (default: 3000)
//! - `CAREPOINT_API_TOKEN`: bearer token required on protected routes (optional)
//! - `CAREPOINT_SEED_DEMO`: `1`/`true` to seed demo data into an empty store

use std::path::PathBuf;

use carepoint_storage::{InMemoryStore, RecordStore, SnapshotStore, SqliteStore, StorageError};

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "carepoint.db";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: unknown store backend {value:?} (expected \"sqlite\" or \"memory\")")]
    UnknownBackend { var: &'static str, value: String },

    #[error("{var}: invalid port {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var}: expected a boolean, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

/// Which [`RecordStore`] backs the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Durable SQLite database.
    Sqlite { path: PathBuf },
    /// In-memory store, mirrored to a snapshot file when a path is given.
    Memory { snapshot: Option<PathBuf> },
}

/// Startup configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub backend: StoreBackend,
    pub port: u16,
    pub api_token: Option<String>,
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            backend: StoreBackend::Sqlite {
                path: PathBuf::from(DEFAULT_DB_PATH),
            },
            port: DEFAULT_PORT,
            api_token: None,
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let backend = match get("CAREPOINT_STORE").as_deref().map(str::trim) {
            None | Some("sqlite") => StoreBackend::Sqlite {
                path: get("CAREPOINT_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            },
            Some("memory") => StoreBackend::Memory {
                snapshot: get("CAREPOINT_SNAPSHOT_PATH").map(PathBuf::from),
            },
            Some(other) => {
                return Err(ConfigError::UnknownBackend {
                    var: "CAREPOINT_STORE",
                    value: other.to_string(),
                })
            }
        };

        let port = match get("CAREPOINT_PORT") {
            None => DEFAULT_PORT,
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "CAREPOINT_PORT",
                value,
            })?,
        };

        let seed_demo = match get("CAREPOINT_SEED_DEMO") {
            None => false,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: "CAREPOINT_SEED_DEMO",
                        value,
                    })
                }
            },
        };

        Ok(ServerConfig {
            backend,
            port,
            api_token: get("CAREPOINT_API_TOKEN"),
            seed_demo,
        })
    }

    /// Opens the configured backend.
    pub fn open_store(&self) -> Result<Box<dyn RecordStore + Send>, StorageError> {
        Ok(match &self.backend {
            StoreBackend::Sqlite { path } => {
                Box::new(SqliteStore::new(&path.to_string_lossy())?)
            }
            StoreBackend::Memory {
                snapshot: Some(path),
            } => Box::new(SnapshotStore::open(path)?),
            StoreBackend::Memory { snapshot: None } => Box::new(InMemoryStore::new()),
        })
    }
}
