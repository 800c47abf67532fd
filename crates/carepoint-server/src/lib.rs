//! HTTP/JSON API for the CarePoint client and health-program registry.
//!
//! Wraps a [`carepoint_storage::RecordStore`] in a [`service::RegistryService`]
//! and exposes it over axum. This crate contains the server framework, API
//! schema types and request validation, error handling, the bearer-token
//! gate, configuration, and route definitions.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
