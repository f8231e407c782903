//! Application State

use std::sync::Arc;

use portfolio_core::{BalanceFetcher, HttpTransport, ServiceConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Balance fetcher (one request per call, never fails)
    pub fetcher: Arc<BalanceFetcher>,

    /// Address used when a request names none
    pub target_wallet: Arc<str>,
}

impl AppState {
    pub fn new(fetcher: BalanceFetcher, target_wallet: impl Into<Arc<str>>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            target_wallet: target_wallet.into(),
        }
    }

    /// Build from loaded configuration with the reqwest transport
    pub fn from_config(config: &ServiceConfig) -> Self {
        let fetcher = BalanceFetcher::new(HttpTransport::new())
            .with_endpoint(config.endpoint.clone())
            .with_default_api_key(config.api_key.clone());

        Self::new(fetcher, config.target_wallet.as_str())
    }
}
