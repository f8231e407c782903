//! HTTP Handlers

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use portfolio_core::config::API_KEY_HEADER;
use portfolio_core::{
    DOMINANCE_QUERY, DashboardReport, DominanceSeries, FetchResult, OutcomeKind, Recommendation,
    recommendations,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub credential_configured: bool,
}

/// Query string shared by the balance, dashboard and report endpoints.
///
/// The caller's credential travels in the `X-Dune-Api-Key` header, never
/// in the query string, so request URIs are safe to log.
#[derive(Debug, Default, Deserialize)]
pub struct WalletQuery {
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub address: String,
    pub outcome: OutcomeKind,
    pub records: FetchResult,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub sql: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

impl WalletQuery {
    /// Requested address, or the configured target when none was given
    fn address(&self, state: &AppState) -> Result<String, ApiError> {
        match self.address.as_deref().map(str::trim) {
            None => Ok(state.target_wallet.to_string()),
            Some("") => Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "address must not be blank".into(),
                    code: "INVALID_ADDRESS".into(),
                }),
            )),
            Some(address) => Ok(address.to_string()),
        }
    }
}

/// Credential supplied by the caller, if any
fn caller_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        credential_configured: state.fetcher.has_default_api_key(),
    })
}

/// Wallet holdings with the path that produced them
pub async fn balances(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WalletQuery>,
) -> Result<Json<BalancesResponse>, ApiError> {
    let address = query.address(&state)?;
    let outcome = state
        .fetcher
        .fetch_outcome(&address, caller_api_key(&headers))
        .await;

    Ok(Json(BalancesResponse {
        address,
        outcome: outcome.kind(),
        records: outcome.into_result(),
    }))
}

/// Simulated V3 vs V2 volume for the last 30 days
pub async fn market() -> Json<DominanceSeries> {
    Json(DominanceSeries::simulate_today())
}

pub async fn strategy() -> Json<Vec<Recommendation>> {
    Json(recommendations())
}

/// The SQL the market series stands in for
pub async fn strategy_query() -> Json<QueryResponse> {
    Json(QueryResponse {
        sql: DOMINANCE_QUERY,
    })
}

/// Holdings, market trend, recommendations and query in one payload
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WalletQuery>,
) -> Result<Json<DashboardReport>, ApiError> {
    Ok(Json(build_report(&state, &headers, &query).await?))
}

/// Plain-text rendering of the dashboard
pub async fn text_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WalletQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = build_report(&state, &headers, &query).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report.render_text(),
    ))
}

async fn build_report(
    state: &AppState,
    headers: &HeaderMap,
    query: &WalletQuery,
) -> Result<DashboardReport, ApiError> {
    let address = query.address(state)?;
    let outcome = state
        .fetcher
        .fetch_outcome(&address, caller_api_key(headers))
        .await;

    if outcome.kind() != OutcomeKind::Live {
        tracing::info!("Dashboard for {} built from {}", address, outcome.kind().label());
    }

    Ok(DashboardReport::new(
        address,
        outcome,
        DominanceSeries::simulate_today(),
    ))
}
