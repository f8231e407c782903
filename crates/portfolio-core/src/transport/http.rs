//! reqwest transport

use async_trait::async_trait;
use reqwest::Client;

use super::{BalanceRequest, BalanceTransport, RawResponse};
use crate::config::API_KEY_HEADER;
use crate::error::TransportError;

/// Balance transport backed by a shared `reqwest::Client`
///
/// Uses the client's default timeouts.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceTransport for HttpTransport {
    async fn get_balances(&self, request: &BalanceRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .get(&request.url)
            .query(&[("chain_ids", request.chain_ids.as_str())]);

        if let Some(ref key) = request.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}
