//! Core error types for carepoint-core.
//!
//! The model itself never fails; the only fallible operations are parsing
//! the textual form of the enum attributes (as stored by SQLite or typed on
//! the command line).

use thiserror::Error;

/// Core errors produced by the carepoint-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A gender string outside `male` / `female` / `other`.
    #[error("unknown gender: '{value}'")]
    UnknownGender { value: String },

    /// An enrollment status string outside `active` / `completed` / `withdrawn`.
    #[error("unknown enrollment status: '{value}'")]
    UnknownStatus { value: String },
}
