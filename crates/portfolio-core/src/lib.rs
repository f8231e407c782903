//! # portfolio-core
//!
//! Wallet balance acquisition with deterministic fallback, plus the
//! strategy data a portfolio report is built from.
//!
//! ## Data flow
//!
//! ```text
//! ┌──────────────┐   GET /balances/{address}   ┌─────────────────┐
//! │ BalanceFetcher│───────────────────────────▶│  Dune Sim API   │
//! └──────┬───────┘◀───────────────────────────└─────────────────┘
//!        │  status + body
//!        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  200 + "balances"     → Records(api order)                   │
//! │  200, no "balances"   → EmptyNoSchema        (0 records)     │
//! │  non-200              → FallbackRemoteError  (ETH/USDC/WETH) │
//! │  no usable response   → EmptyTransportError  (0 records)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fetch never fails. Callers that only want rows use
//! [`BalanceFetcher::fetch`]; callers that want to show *why* a table is
//! empty or synthetic use [`BalanceFetcher::fetch_outcome`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use portfolio_core::{BalanceFetcher, HttpTransport};
//!
//! let fetcher = BalanceFetcher::new(HttpTransport::new());
//! let balances = fetcher.fetch("0xd8da6bf26964af9d7eed9e03e53415d37aa96045", None).await;
//! for record in &balances {
//!     println!("{} {}", record.symbol, record.amount);
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod market;
pub mod model;
pub mod report;
pub mod strategy;
pub mod transport;

pub use config::{BalanceEndpoint, ServiceConfig, resolve_credential};
pub use error::{PortfolioError, Result, TransportError};
pub use fetcher::{BalanceFetcher, classify};
pub use market::{DOMINANCE_QUERY, DominancePoint, DominanceSeries};
pub use model::{BalanceRecord, FetchOutcome, FetchResult, OutcomeKind, fallback_balances};
pub use report::DashboardReport;
pub use strategy::{Recommendation, recommendations};
pub use transport::{BalanceRequest, BalanceTransport, HttpTransport, MockTransport, RawResponse};
