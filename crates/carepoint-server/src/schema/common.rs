//! Common API response wrapper and request helpers.
//!
//! [`ApiResponse`] provides the standard envelope for all successful API
//! responses, with an optional human-readable message.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Standard API response envelope.
///
/// The `success` field is always `true` for non-error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true` for successful responses.
    pub success: bool,
    /// Response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Confirmation message for mutations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Create a successful response with data and a message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Deserializes a present field (even `null`) as `Some(_)`.
///
/// Used with `#[serde(default)]` on `Option<Option<T>>` so that an absent
/// field, an explicit `null`, and a value can be told apart in patches.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Fails with `message` if `value` is blank.
pub fn require(value: String, message: &str) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::BadRequest(message.to_string()))
    } else {
        Ok(value)
    }
}

/// Like [`require`], for a field that may be absent.
pub fn require_if_present(
    value: Option<String>,
    message: &str,
) -> Result<Option<String>, ApiError> {
    value.map(|v| require(v, message)).transpose()
}
