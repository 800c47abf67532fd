//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for a specific
//! API domain. Request types deserialize leniently (missing fields default
//! to empty) and are turned into store inputs by their `validate` methods,
//! which are the only place field rules are enforced.

pub mod clients;
pub mod common;
pub mod dashboard;
pub mod enrollments;
pub mod health;
pub mod programs;
