//! Dashboard summary handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::dashboard::DashboardResponse;
use crate::state::AppState;

/// Registry totals and the most recently registered clients.
///
/// `GET /dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.dashboard()?)))
}
