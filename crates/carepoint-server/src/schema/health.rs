//! Liveness probe response.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}
