//! CoinGecko price source implementation

use crate::{
    constants::{COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT},
    error::SourceError,
    provider::PriceSource,
    providers::http::get_json,
    symbols,
    types::CanonicalSymbol,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// CoinGecko API response for simple price queries, keyed by coin id
type CoinGeckoResponse = HashMap<String, CoinGeckoPriceData>;

#[derive(Debug, Deserialize)]
struct CoinGeckoPriceData {
    usd: Option<f64>,
}

/// CoinGecko error bodies come in two shapes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinGeckoErrorBody {
    Status { status: CoinGeckoErrorStatus },
    Plain { error: String },
}

#[derive(Debug, Deserialize)]
struct CoinGeckoErrorStatus {
    error_code: i64,
    error_message: String,
}

/// CoinGecko price source
///
/// CoinGecko quotes floats, so the price is rendered with two decimals.
pub struct CoinGeckoSource {
    client: Client,
    base_url: String,
}

impl CoinGeckoSource {
    /// Creates a new CoinGecko source on the public API
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, COINGECKO_API_URL)
    }

    /// Creates a CoinGecko source against another host (mirrors, tests)
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Extracts the USD price for `coin_id` from the response
    fn parse_response(
        response: &CoinGeckoResponse,
        coin_id: &str,
        symbol: &CanonicalSymbol,
    ) -> Result<String, SourceError> {
        response
            .get(coin_id)
            .and_then(|data| data.usd)
            .map(|usd| format!("{:.2}", usd))
            .ok_or_else(|| SourceError::price_not_found(symbol.as_str()))
    }

    fn decode_error(body: &str) -> Option<String> {
        match serde_json::from_str::<CoinGeckoErrorBody>(body).ok()? {
            CoinGeckoErrorBody::Status { status } => {
                Some(format!("{}: {}", status.error_code, status.error_message))
            }
            CoinGeckoErrorBody::Plain { error } => Some(error),
        }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch(&self, symbol: &CanonicalSymbol) -> Result<String, SourceError> {
        let coin_id = symbols::coingecko_id(symbol)
            .ok_or_else(|| SourceError::unsupported(self.exchange_name(), symbol.as_str()))?;

        let url = format!("{}{}", self.base_url, COINGECKO_SIMPLE_PRICE_ENDPOINT);
        tracing::debug!(url = %url, coin_id, "Fetching price from CoinGecko");

        let request = self
            .client
            .get(&url)
            .query(&[("ids", coin_id), ("vs_currencies", "usd")]);
        let response: CoinGeckoResponse =
            get_json(request, self.exchange_name(), Self::decode_error).await?;

        Self::parse_response(&response, coin_id, symbol)
    }

    fn exchange_name(&self) -> &'static str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(raw: &str) -> CanonicalSymbol {
        CanonicalSymbol::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_response_formats_two_decimals() {
        let response: CoinGeckoResponse =
            serde_json::from_str(r#"{"bitcoin":{"usd":67012.3456}}"#).unwrap();
        let price = CoinGeckoSource::parse_response(&response, "bitcoin", &sym("BTC")).unwrap();
        assert_eq!(price, "67012.35");

        let response: CoinGeckoResponse =
            serde_json::from_str(r#"{"shiba-inu":{"usd":0.00001712}}"#).unwrap();
        let price = CoinGeckoSource::parse_response(&response, "shiba-inu", &sym("SHIB")).unwrap();
        assert_eq!(price, "0.00");
    }

    #[test]
    fn test_parse_response_missing_coin() {
        let response: CoinGeckoResponse = serde_json::from_str("{}").unwrap();
        let err = CoinGeckoSource::parse_response(&response, "bitcoin", &sym("BTC")).unwrap_err();
        assert!(matches!(err, SourceError::PriceNotFound { .. }));
    }

    #[test]
    fn test_decode_error_bodies() {
        let body = r#"{"status":{"error_code":429,"error_message":"You've exceeded the Rate Limit."}}"#;
        assert_eq!(
            CoinGeckoSource::decode_error(body).as_deref(),
            Some("429: You've exceeded the Rate Limit.")
        );
        assert_eq!(
            CoinGeckoSource::decode_error(r#"{"error":"coin not found"}"#).as_deref(),
            Some("coin not found")
        );
        assert_eq!(CoinGeckoSource::decode_error("oops"), None);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_rejected_locally() {
        // Nothing listens on the discard port; reaching the network would
        // surface a transport error instead.
        let source = CoinGeckoSource::with_base_url(Client::new(), "http://127.0.0.1:9");
        let err = source.fetch(&sym("FOO")).await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::UnsupportedSymbol { exchange: "CoinGecko", .. }
        ));
    }
}
