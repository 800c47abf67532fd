//! Core record model for CarePoint.
//!
//! Defines the three entities the registry tracks ([`Client`],
//! [`HealthProgram`], [`Enrollment`]), their typed ids, the explicit patch
//! types used for partial updates, and the read-only join views assembled
//! by the storage layer.
//!
//! Nothing in this crate performs I/O. Entities are plain values; the
//! storage crate owns the collections they live in.

pub mod client;
pub mod enrollment;
pub mod error;
pub mod id;
pub mod program;
pub mod time;
pub mod views;

// Re-export commonly used types
pub use client::{Client, ClientPatch, Gender, NewClient};
pub use enrollment::{Enrollment, EnrollmentPatch, EnrollmentStatus};
pub use error::CoreError;
pub use id::{ClientId, EnrollmentId, ProgramId};
pub use program::{HealthProgram, NewProgram, ProgramPatch};
pub use views::{
    ClientWithEnrollments, EnrollmentWithClient, EnrollmentWithProgram, ProgramWithEnrollments,
};
