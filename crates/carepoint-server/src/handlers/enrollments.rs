//! Enrollment handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use carepoint_core::{Enrollment, EnrollmentId};

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::enrollments::{
    CreateEnrollmentRequest, EnrollmentQuery, UpdateEnrollmentRequest,
};
use crate::state::AppState;

/// Lists enrollments, optionally filtered by client, program and status.
///
/// `GET /enrollments`
pub async fn list_enrollments(
    State(state): State<AppState>,
    query: Result<Query<EnrollmentQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, ApiError> {
    let Query(query) = query?;
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_enrollments(&query)?)))
}

/// Enrolls a client in a program.
///
/// `POST /enrollments`
pub async fn create_enrollment(
    State(state): State<AppState>,
    body: Result<Json<CreateEnrollmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), ApiError> {
    let Json(req) = body?;
    let req = req.validate()?;
    let mut service = state.service.lock().await;
    let enrollment = service.enroll(req)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            enrollment,
            "Client enrolled successfully",
        )),
    ))
}

/// Gets a single enrollment.
///
/// `GET /enrollments/{id}`
pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<ApiResponse<Enrollment>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.get_enrollment(&id)?)))
}

/// Updates an enrollment's status and/or notes.
///
/// `PUT /enrollments/{id}`
pub async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    body: Result<Json<UpdateEnrollmentRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Enrollment>>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    let enrollment = service.update_enrollment(&id, req.into_patch())?;
    Ok(Json(ApiResponse::ok_with_message(
        enrollment,
        "Enrollment updated successfully",
    )))
}

/// Cancels an enrollment by marking it withdrawn.
///
/// `DELETE /enrollments/{id}`
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut service = state.service.lock().await;
    service.cancel_enrollment(&id)?;
    Ok(Json(ApiResponse::message("Enrollment cancelled successfully")))
}
