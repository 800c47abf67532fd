//! Dashboard summary response.

use carepoint_core::Client;
use serde::Serialize;

/// Number of clients listed in [`DashboardResponse::recent_clients`].
pub const RECENT_CLIENTS: usize = 5;

/// Response of `GET /dashboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_clients: usize,
    pub total_programs: usize,
    pub active_enrollments: usize,
    /// Most recently registered clients, newest first.
    pub recent_clients: Vec<Client>,
}
