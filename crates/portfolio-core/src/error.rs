//! Error Types

use thiserror::Error;

/// Result type alias for portfolio operations
pub type Result<T> = std::result::Result<T, PortfolioError>;

/// Errors surfaced while loading service configuration.
///
/// The balance fetch itself never returns one of these; its failures are
/// folded into [`crate::FetchOutcome`].
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a balance request produced no usable response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("response body unreadable: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = PortfolioError::Config("DUNE_API_KEY not set".into());
        assert_eq!(err.to_string(), "Configuration error: DUNE_API_KEY not set");
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Connect("refused".into());
        assert_eq!(err.to_string(), "connection failed: refused");
    }
}
