//! Router assembly for the CarePoint HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_token;
use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// `/health` and `/public/programs` are open; every other route sits behind
/// [`require_token`]. Routes use axum 0.8 `/{param}` path syntax.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/public/programs", get(handlers::programs::public_programs));

    let protected = Router::new()
        // Clients
        .route(
            "/clients",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::clients::get_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        // Programs
        .route(
            "/programs",
            get(handlers::programs::list_programs).post(handlers::programs::create_program),
        )
        .route(
            "/programs/{id}",
            get(handlers::programs::get_program)
                .put(handlers::programs::update_program)
                .delete(handlers::programs::delete_program),
        )
        // Enrollments
        .route(
            "/enrollments",
            get(handlers::enrollments::list_enrollments)
                .post(handlers::enrollments::create_enrollment),
        )
        .route(
            "/enrollments/{id}",
            get(handlers::enrollments::get_enrollment)
                .put(handlers::enrollments::update_enrollment)
                .delete(handlers::enrollments::cancel_enrollment),
        )
        // Dashboard
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
