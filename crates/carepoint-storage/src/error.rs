//! Storage error types for carepoint-storage.
//!
//! [`StorageError`] covers backend failures only. Missing records are not
//! errors; they surface as `None`/`false` from [`crate::RecordStore`].

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite backend reported an error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Reading or writing a snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record references an entity that no longer exists.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
