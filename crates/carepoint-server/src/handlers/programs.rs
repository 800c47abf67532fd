//! Health program handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use carepoint_core::{HealthProgram, ProgramId, ProgramWithEnrollments};

use crate::error::ApiError;
use crate::schema::common::ApiResponse;
use crate::schema::programs::{CreateProgramRequest, PublicProgramView, UpdateProgramRequest};
use crate::state::AppState;

/// Lists all programs.
///
/// `GET /programs`
pub async fn list_programs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<HealthProgram>>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.list_programs()?)))
}

/// Lists program names and descriptions without authentication.
///
/// `GET /public/programs`
pub async fn public_programs(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PublicProgramView>>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.public_programs()?)))
}

/// Creates a new program.
///
/// `POST /programs`
pub async fn create_program(
    State(state): State<AppState>,
    body: Result<Json<CreateProgramRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<HealthProgram>>), ApiError> {
    let Json(req) = body?;
    let data = req.validate()?;
    let mut service = state.service.lock().await;
    let program = service.create_program(data)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(program, "Program created successfully")),
    ))
}

/// Gets a program with its enrollments and clients.
///
/// `GET /programs/{id}`
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
) -> Result<Json<ApiResponse<ProgramWithEnrollments>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.get_program(&id)?)))
}

/// Updates a program's name and/or description.
///
/// `PUT /programs/{id}`
pub async fn update_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
    body: Result<Json<UpdateProgramRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<HealthProgram>>, ApiError> {
    let Json(req) = body?;
    let patch = req.validate()?;
    let mut service = state.service.lock().await;
    let program = service.update_program(&id, patch)?;
    Ok(Json(ApiResponse::ok_with_message(
        program,
        "Program updated successfully",
    )))
}

/// Deletes a program and its enrollments.
///
/// `DELETE /programs/{id}`
pub async fn delete_program(
    State(state): State<AppState>,
    Path(id): Path<ProgramId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_program(&id)?;
    Ok(Json(ApiResponse::message("Program deleted successfully")))
}
