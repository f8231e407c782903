//! Balance API Transport
//!
//! The single network call behind a balance fetch, kept behind a trait so
//! the outcome mapping can be driven without a live service.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;

use crate::config::BalanceEndpoint;
use crate::error::TransportError;

/// One balance request, fully resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceRequest {
    /// Full URL without the query string
    pub url: String,

    /// `chain_ids` query value
    pub chain_ids: String,

    /// API key for the `X-Dune-Api-Key` header, if any
    pub api_key: Option<String>,
}

impl BalanceRequest {
    pub fn new(endpoint: &BalanceEndpoint, address: &str, api_key: Option<String>) -> Self {
        Self {
            url: endpoint.url_for(address),
            chain_ids: endpoint.chain_ids.clone(),
            api_key,
        }
    }
}

/// Status and fully-read body of a response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Transport trait (Strategy pattern)
///
/// Implementations perform exactly one request and return once the body
/// has been read, so nothing stays open after the call.
#[async_trait]
pub trait BalanceTransport: Send + Sync {
    async fn get_balances(&self, request: &BalanceRequest) -> Result<RawResponse, TransportError>;

    /// Transport name
    fn name(&self) -> &str;
}
