//! Storage layer for the CarePoint registry.
//!
//! Provides the [`RecordStore`] trait defining the storage contract, plus
//! three backends:
//!
//! - [`InMemoryStore`]: plain vectors, for tests and ephemeral sessions.
//! - [`SnapshotStore`]: an [`InMemoryStore`] loaded from a JSON snapshot
//!   file at open and written back after every mutation.
//! - [`SqliteStore`]: durable SQLite database with migrations.
//!
//! # Architecture
//!
//! Backends implement a small set of **primitive** methods (lookup, list,
//! insert, replace, delete). The registry operations (`add_client`,
//! `enroll_client_in_program`, `get_client_with_programs`, ...) are
//! provided methods on the trait built from those primitives, so every
//! backend shares the same id/timestamp, idempotency and join semantics.
//!
//! Absence is never an error: lookups return `Ok(None)`, deletes return
//! `Ok(false)`. `Err` is reserved for backend failures.

pub mod demo;
pub mod error;
pub mod memory;
pub mod schema;
pub mod snapshot;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use snapshot::{Snapshot, SnapshotStore, STORE_NAME};
pub use sqlite::SqliteStore;
pub use traits::RecordStore;
