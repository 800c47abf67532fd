//! Client registration and management handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use carepoint_core::{Client, ClientId, ClientWithEnrollments};

use crate::error::ApiError;
use crate::schema::clients::{ClientSearchQuery, CreateClientRequest, UpdateClientRequest};
use crate::schema::common::ApiResponse;
use crate::state::AppState;

/// Lists clients, filtered by `?search=` when given.
///
/// `GET /clients`
pub async fn list_clients(
    State(state): State<AppState>,
    query: Result<Query<ClientSearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Client>>>, ApiError> {
    let Query(query) = query?;
    let service = state.service.lock().await;
    let clients = service.list_clients(query.search.as_deref())?;
    Ok(Json(ApiResponse::ok(clients)))
}

/// Registers a new client.
///
/// `POST /clients`
pub async fn create_client(
    State(state): State<AppState>,
    body: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), ApiError> {
    let Json(req) = body?;
    let data = req.validate()?;
    let mut service = state.service.lock().await;
    let client = service.create_client(data)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(client, "Client created successfully")),
    ))
}

/// Gets a client with its enrollments and programs.
///
/// `GET /clients/{id}`
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<ApiResponse<ClientWithEnrollments>>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ApiResponse::ok(service.get_client(&id)?)))
}

/// Updates the fields present in the body.
///
/// `PUT /clients/{id}`
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
    body: Result<Json<UpdateClientRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Client>>, ApiError> {
    let Json(req) = body?;
    let patch = req.validate()?;
    let mut service = state.service.lock().await;
    let client = service.update_client(&id, patch)?;
    Ok(Json(ApiResponse::ok_with_message(
        client,
        "Client updated successfully",
    )))
}

/// Deletes a client and its enrollments.
///
/// `DELETE /clients/{id}`
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<ClientId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_client(&id)?;
    Ok(Json(ApiResponse::message("Client deleted successfully")))
}
