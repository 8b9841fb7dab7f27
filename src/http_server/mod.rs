use axum::routing::get;
use axum::{Extension, Router};
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
mod handlers;
mod health;
mod html;

pub use config::Config;

use crate::state::State;

const API_PREFIX: &str = "/api";
const STATUS_PREFIX: &str = "/_status";

/// Build the full application router: status probes, the JSON API, and the
/// HTML views, with a not-found fallback that honors Accept.
pub fn router(state: State) -> Router {
    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(API_PREFIX, api::router(state.clone()))
        .route("/", get(handlers::app_info_handler))
        .fallback(handlers::not_found_handler)
        .with_state(state)
}

/// Run the HTTP server (JSON API + HTML views) until shutdown.
pub async fn run(
    config: Config,
    state: State,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let listen_addr = config.listen_addr;
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    let router = router(state)
        .layer(Extension(config.clone()))
        .layer(trace_layer);

    tracing::info!(addr = ?listen_addr, "catalog server listening");
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
