//! HTTP handler modules for the CarePoint API.
//!
//! Each sub-module implements thin handlers that parse and validate
//! requests, acquire the service lock, delegate to
//! [`crate::service::RegistryService`], and wrap the result in an
//! [`crate::schema::common::ApiResponse`]. No business logic lives in
//! handlers.

pub mod clients;
pub mod dashboard;
pub mod enrollments;
pub mod health;
pub mod programs;
