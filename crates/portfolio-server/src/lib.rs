//! # portfolio-server
//!
//! Axum service exposing wallet holdings, the simulated V3/V2 market trend
//! and the strategy recommendations as JSON, plus a plain-text dashboard.
//! The `portfolio-report` binary writes the same dashboard to a file.

pub mod handlers;
pub mod state;

use axum::{Router, body::Body, http::Request, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{
    balances, dashboard, health_check, market, strategy, strategy_query, text_report,
};
use crate::state::AppState;

/// Install the `tracing` subscriber, filtered by `RUST_LOG`
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Request span with method and path only; the query string is left out
fn request_span(request: &Request<Body>) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Build the router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))

        // Dashboard data
        .route("/api/balances", get(balances))
        .route("/api/market", get(market))
        .route("/api/recommendations", get(strategy))
        .route("/api/query", get(strategy_query))
        .route("/api/dashboard", get(dashboard))

        // Text dashboard
        .route("/report", get(text_report))

        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}
