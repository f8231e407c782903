//! portfolio-server
//!
//! Axum-based server providing the wallet dashboard API.

use portfolio_core::ServiceConfig;
use portfolio_server::{app, init_tracing, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before reading RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;

    if config.api_key.is_some() {
        tracing::info!("✓ Dune Sim API key configured");
    } else {
        tracing::warn!("⚠ DUNE_API_KEY not set - running in demo mode");
        tracing::warn!("  Requests without an X-Dune-Api-Key header will receive demo holdings");
    }
    tracing::info!("Balance endpoint: {}", config.endpoint.base_url);

    let state = AppState::from_config(&config);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 portfolio-server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /api/balances        - Wallet holdings (?address=, X-Dune-Api-Key)");
    tracing::info!("  GET  /api/market          - V3 vs V2 volume trend");
    tracing::info!("  GET  /api/recommendations - Strategy recommendations");
    tracing::info!("  GET  /api/query           - Underlying SQL query");
    tracing::info!("  GET  /api/dashboard       - Everything above in one payload");
    tracing::info!("  GET  /report              - Plain-text dashboard");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
