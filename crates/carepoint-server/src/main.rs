//! Binary entrypoint for the CarePoint HTTP server.
//!
//! Configuration comes from `CAREPOINT_*` environment variables (see
//! [`carepoint_server::config`]); log filtering from `RUST_LOG`.

use carepoint_server::config::ServerConfig;
use carepoint_server::router::build_router;
use carepoint_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("carepoint_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        backend = ?config.backend,
        auth = config.api_token.is_some(),
        "carepoint server starting on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
