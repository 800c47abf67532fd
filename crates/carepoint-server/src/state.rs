//! Application state with a shared `RegistryService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` so handlers
//! await the lock without blocking the tokio runtime. A `Mutex` rather than
//! an `RwLock` because `SqliteStore` holds a `rusqlite::Connection`, which is
//! `!Sync`.

use std::sync::Arc;

use carepoint_storage::RecordStore;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::RegistryService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared registry service.
    pub service: Arc<tokio::sync::Mutex<RegistryService>>,
    /// Bearer token required on protected routes, if any.
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    /// Opens the configured store, seeding demo data if requested.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let mut service = RegistryService::new(config.open_store()?);
        if config.seed_demo {
            service.seed_demo()?;
        }
        Ok(Self::from_service(service, config.api_token.as_deref()))
    }

    /// State over an arbitrary store.
    pub fn with_store(store: Box<dyn RecordStore + Send>, api_token: Option<&str>) -> Self {
        Self::from_service(RegistryService::new(store), api_token)
    }

    /// Unauthenticated state over an empty in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::from_service(RegistryService::in_memory(), None)
    }

    fn from_service(service: RegistryService, api_token: Option<&str>) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            api_token: api_token.map(Arc::from),
        }
    }
}
