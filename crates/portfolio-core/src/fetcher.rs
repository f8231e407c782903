//! Balance Fetcher
//!
//! One request per call, no retries and no caching. Every failure is
//! absorbed into a [`FetchOutcome`]:
//!
//! | response                     | outcome                 | rows     | logged |
//! |------------------------------|-------------------------|----------|--------|
//! | 200 with `balances`          | `Records`               | API rows | no     |
//! | 200 without `balances`       | `EmptyNoSchema`         | none     | no     |
//! | 200 with unreadable JSON     | `EmptyTransportError`   | none     | error  |
//! | 200, `balances` not an array | `EmptyTransportError`   | none     | error  |
//! | any other status             | `FallbackRemoteError`   | fallback | warn   |
//! | no response                  | `EmptyTransportError`   | none     | error  |
//!
//! A single entry without a usable `amount` is skipped with a warning;
//! the rest of the list is kept.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::{API_KEY_ENV, BalanceEndpoint, resolve_credential};
use crate::model::{BalanceRecord, FetchOutcome, FetchResult};
use crate::transport::{BalanceRequest, BalanceTransport};

/// Map a status and body to an outcome. No I/O; skipped entries are logged.
pub fn classify(status: u16, body: &str) -> FetchOutcome {
    if status != 200 {
        return FetchOutcome::FallbackRemoteError {
            status,
            body: body.to_string(),
        };
    }

    let payload: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            return FetchOutcome::EmptyTransportError {
                reason: format!("malformed response: {e}"),
            };
        }
    };

    let balances = match payload.get("balances") {
        None | Some(Value::Null) => return FetchOutcome::EmptyNoSchema,
        Some(balances) => balances,
    };

    let Some(entries) = balances.as_array() else {
        return FetchOutcome::EmptyTransportError {
            reason: "malformed balances: expected an array".into(),
        };
    };

    let records = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match BalanceRecord::deserialize(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping balance entry {}: {}", index, e);
                None
            }
        })
        .collect();

    FetchOutcome::Records(FetchResult::new(records))
}

/// Fetches wallet balances and never fails
pub struct BalanceFetcher {
    transport: Arc<dyn BalanceTransport>,
    endpoint: BalanceEndpoint,
    default_api_key: Option<String>,
}

impl BalanceFetcher {
    /// Create with the default endpoint; the fallback credential is read
    /// from `DUNE_API_KEY`.
    pub fn new(transport: impl BalanceTransport + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn BalanceTransport>) -> Self {
        Self {
            transport,
            endpoint: BalanceEndpoint::default(),
            default_api_key: resolve_credential(None, std::env::var(API_KEY_ENV).ok()),
        }
    }

    pub fn with_endpoint(mut self, endpoint: BalanceEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Replace the credential used when a call passes none
    pub fn with_default_api_key(mut self, api_key: Option<String>) -> Self {
        self.default_api_key = api_key;
        self
    }

    pub fn endpoint(&self) -> &BalanceEndpoint {
        &self.endpoint
    }

    pub fn has_default_api_key(&self) -> bool {
        self.default_api_key.is_some()
    }

    /// Balances for `address`, collapsed to rows.
    ///
    /// Zero rows when the service was unreachable or reported no balances;
    /// the fixed demo set when it answered with an error status.
    pub async fn fetch(&self, address: &str, credential: Option<&str>) -> FetchResult {
        self.fetch_outcome(address, credential).await.into_result()
    }

    /// Balances for `address`, keeping track of which path produced them
    pub async fn fetch_outcome(&self, address: &str, credential: Option<&str>) -> FetchOutcome {
        info!("Fetching live balances for {}", address);

        let api_key = resolve_credential(credential, self.default_api_key.clone());
        if api_key.is_none() {
            warn!("No API key configured, sending balance request without credential");
        }

        let request = BalanceRequest::new(&self.endpoint, address, api_key);

        let outcome = match self.transport.get_balances(&request).await {
            Ok(response) => classify(response.status, &response.body),
            Err(e) => FetchOutcome::EmptyTransportError {
                reason: e.to_string(),
            },
        };

        match &outcome {
            FetchOutcome::Records(records) => {
                debug!("Parsed {} balance records for {}", records.len(), address);
            }
            FetchOutcome::FallbackRemoteError { status, body } => {
                warn!("API error {}: {}", status, body);
            }
            FetchOutcome::EmptyTransportError { reason } => {
                error!("Connection error via {}: {}", self.transport.name(), reason);
            }
            FetchOutcome::EmptyNoSchema => {}
        }

        outcome
    }
}
