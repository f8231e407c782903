//! Configuration
//!
//! Endpoint settings for the balance API and the service-level settings
//! shared by the server and the report CLI. There is no built-in API key:
//! the credential comes from the caller or from `DUNE_API_KEY`.

use crate::error::{PortfolioError, Result};

/// Environment variable holding the balance API key
pub const API_KEY_ENV: &str = "DUNE_API_KEY";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-Dune-Api-Key";

pub const DEFAULT_BASE_URL: &str = "https://api.sim.dune.com/v1/evm/balances";
pub const DEFAULT_CHAIN_IDS: &str = "1";

/// Well-known demo address used when no target wallet is configured
pub const DEFAULT_TARGET_WALLET: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_REPORT_PATH: &str = "Portfolio_Strategy_Dashboard.txt";

/// Pick the credential: explicit argument first, then the environment value.
///
/// Blank values count as absent.
pub fn resolve_credential(explicit: Option<&str>, env_value: Option<String>) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .or_else(|| {
            env_value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Where and how balance requests are sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceEndpoint {
    /// Base URL; the address is appended as the last path segment
    pub base_url: String,

    /// Value of the `chain_ids` query parameter
    pub chain_ids: String,
}

impl Default for BalanceEndpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            chain_ids: DEFAULT_CHAIN_IDS.into(),
        }
    }
}

impl BalanceEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_chain_ids(mut self, chain_ids: impl Into<String>) -> Self {
        self.chain_ids = chain_ids.into();
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("DUNE_SIM_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let chain_ids = lookup("DUNE_CHAIN_IDS")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CHAIN_IDS.into());

        Self { base_url, chain_ids }
    }

    /// URL for one address, without the query string
    pub fn url_for(&self, address: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), address)
    }
}

/// Settings shared by the server and the report CLI
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub endpoint: BalanceEndpoint,

    /// Deployment credential, used when a request brings none
    pub api_key: Option<String>,

    /// Address used when a request names none
    pub target_wallet: String,

    pub bind_addr: String,

    pub report_path: String,
}

impl ServiceConfig {
    /// Load from environment variables.
    ///
    /// Fails when `DUNE_API_KEY` is missing unless
    /// `PORTFOLIO_ALLOW_ANONYMOUS` is set to a truthy value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = resolve_credential(None, lookup(API_KEY_ENV));
        let allow_anonymous = lookup("PORTFOLIO_ALLOW_ANONYMOUS")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        if api_key.is_none() && !allow_anonymous {
            return Err(PortfolioError::Config(format!(
                "{API_KEY_ENV} not set (set PORTFOLIO_ALLOW_ANONYMOUS=1 to run in demo mode)"
            )));
        }

        let get_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            endpoint: BalanceEndpoint::from_lookup(&lookup),
            api_key,
            target_wallet: get_or("TARGET_WALLET", DEFAULT_TARGET_WALLET),
            bind_addr: get_or("BIND_ADDR", DEFAULT_BIND_ADDR),
            report_path: get_or("REPORT_PATH", DEFAULT_REPORT_PATH),
        })
    }
}
