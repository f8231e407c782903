//! Drives the reqwest transport against a local stand-in for the balance API.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use portfolio_core::{
    BalanceEndpoint, BalanceFetcher, FetchOutcome, HttpTransport, OutcomeKind, fallback_balances,
};

const TEST_KEY: &str = "test-key";

#[derive(Deserialize)]
struct ChainQuery {
    chain_ids: Option<String>,
}

async fn stub_balances(
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let key = headers.get("x-dune-api-key").and_then(|v| v.to_str().ok());
    if key != Some(TEST_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid api key"})));
    }

    match address.as_str() {
        "0xempty" => (StatusCode::OK, Json(json!({}))),
        "0xboom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "wallet_address": address,
                "balances": [
                    {"symbol": "ETH", "amount": "1000", "chain": query.chain_ids},
                    {"symbol": "USDC", "amount": "2500000", "decimals": 6, "value_usd": 2.5}
                ]
            })),
        ),
    }
}

async fn spawn_stub() -> String {
    let app = Router::new().route("/v1/evm/balances/{address}", get(stub_balances));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1/evm/balances")
}

fn fetcher(base_url: &str) -> BalanceFetcher {
    BalanceFetcher::new(HttpTransport::new())
        .with_endpoint(BalanceEndpoint::new(base_url))
        .with_default_api_key(None)
}

#[tokio::test]
async fn test_live_balances_in_api_order() {
    let base = spawn_stub().await;
    let result = fetcher(&base).fetch("0xd8da", Some(TEST_KEY)).await;

    assert_eq!(result.len(), 2);
    let eth = &result.records()[0];
    assert_eq!(eth.symbol, "ETH");
    assert_eq!(eth.amount, "1000");
    assert_eq!(eth.chain.as_deref(), Some("1"));

    let usdc = &result.records()[1];
    assert_eq!(usdc.symbol, "USDC");
    assert_eq!(usdc.display_amount(usdc.decimals.unwrap()), "2.5");
    assert!(usdc.value_usd.is_some());
}

#[tokio::test]
async fn test_chain_ids_forwarded() {
    let base = spawn_stub().await;
    let fetcher = BalanceFetcher::new(HttpTransport::new())
        .with_endpoint(BalanceEndpoint::new(base).with_chain_ids("8453"))
        .with_default_api_key(Some(TEST_KEY.into()));

    let result = fetcher.fetch("0xd8da", None).await;
    assert_eq!(result.records()[0].chain.as_deref(), Some("8453"));
}

#[tokio::test]
async fn test_missing_balances_key_is_empty() {
    let base = spawn_stub().await;
    let outcome = fetcher(&base).fetch_outcome("0xempty", Some(TEST_KEY)).await;

    assert_eq!(outcome, FetchOutcome::EmptyNoSchema);
    assert!(outcome.into_result().is_empty());
}

#[tokio::test]
async fn test_server_error_yields_fallback() {
    let base = spawn_stub().await;
    let fetcher = fetcher(&base);

    let outcome = fetcher.fetch_outcome("0xboom", Some(TEST_KEY)).await;
    match &outcome {
        FetchOutcome::FallbackRemoteError { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }

    let first = fetcher.fetch("0xboom", Some(TEST_KEY)).await;
    let second = fetcher.fetch("0xboom", Some(TEST_KEY)).await;
    assert_eq!(first, fallback_balances());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_credential_yields_fallback() {
    let base = spawn_stub().await;
    let outcome = fetcher(&base).fetch_outcome("0xd8da", None).await;

    assert_eq!(outcome.kind(), OutcomeKind::FallbackRemoteError);
}

#[tokio::test]
async fn test_connection_refused_is_empty_not_fallback() {
    // Reserve a port, then free it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{addr}/v1/evm/balances");
    let fetcher = fetcher(&base);

    let outcome = fetcher.fetch_outcome("0xd8da", Some(TEST_KEY)).await;
    assert_eq!(outcome.kind(), OutcomeKind::EmptyTransportError);

    let result = fetcher.fetch("0xd8da", Some(TEST_KEY)).await;
    assert!(result.is_empty());
    assert_ne!(result, fallback_balances());
}
