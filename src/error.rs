//! Error types for the spot price aggregator

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching a price from one exchange
#[derive(Debug, Error)]
pub enum SourceError {
    /// Symbol has no entry in the exchange's translation table
    #[error("Unsupported symbol for {exchange}: {symbol}")]
    UnsupportedSymbol {
        exchange: &'static str,
        symbol: String,
    },

    /// Exchange answered with a failure
    #[error("Remote error (status {status}): {message}")]
    RemoteError { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// Well-formed response without the expected price field
    #[error("Price not found for {symbol}")]
    PriceNotFound { symbol: String },

    /// Network request failed
    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    /// Source did not finish within the aggregator's deadline
    #[error("Source timed out after {0:?}")]
    Timeout(Duration),
}

impl SourceError {
    /// Creates an UnsupportedSymbol error
    pub fn unsupported(exchange: &'static str, symbol: &str) -> Self {
        Self::UnsupportedSymbol {
            exchange,
            symbol: symbol.to_string(),
        }
    }

    /// Creates a RemoteError
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::RemoteError {
            status,
            message: message.into(),
        }
    }

    /// Creates a PriceNotFound error
    pub fn price_not_found(symbol: &str) -> Self {
        Self::PriceNotFound {
            symbol: symbol.to_string(),
        }
    }

    /// Short machine-friendly name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::UnsupportedSymbol { .. } => "unsupported_symbol",
            SourceError::RemoteError { .. } => "remote_error",
            SourceError::DecodeError(_) => "decode_error",
            SourceError::PriceNotFound { .. } => "price_not_found",
            SourceError::TransportError(_) => "transport_error",
            SourceError::Timeout(_) => "timeout",
        }
    }
}

/// Errors raised while setting the service up
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    /// The shared HTTP client could not be built (e.g. TLS backend init)
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors returned by the HTTP layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SourceError::unsupported("Kraken", "FOO");
        assert_eq!(err.to_string(), "Unsupported symbol for Kraken: FOO");

        let err = SourceError::remote(400, "-1121: Invalid symbol.");
        assert_eq!(
            err.to_string(),
            "Remote error (status 400): -1121: Invalid symbol."
        );
        assert_eq!(err.kind(), "remote_error");
    }

    #[test]
    fn test_client_build_failure_is_a_setup_error() {
        let reqwest_err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();

        let err = ConfigError::from(reqwest_err);

        assert!(matches!(err, ConfigError::HttpClient(_)));
        assert!(err.to_string().starts_with("Failed to build HTTP client: "));
    }

    #[test]
    fn test_bad_request_response() {
        let response = ApiError::BadRequest("Missing symbol".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
