//! Kraken price source implementation

use crate::{
    constants::{KRAKEN_API_URL, KRAKEN_TICKER_ENDPOINT},
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

/// Kraken public ticker response
///
/// Kraken reports failures in `error` even on HTTP 200.
#[derive(Debug, Deserialize)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: HashMap<String, KrakenTicker>,
}

#[derive(Debug, Deserialize)]
struct KrakenTicker {
    /// Last trade closed: [price, lot volume]
    #[serde(default)]
    c: Vec<String>,
}

/// Kraken price source
pub struct KrakenSource {
    client: Client,
    base_url: String,
}

impl KrakenSource {
    /// Creates a new Kraken source on the public API
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, KRAKEN_API_URL)
    }

    /// Creates a Kraken source against another host (mirrors, tests)
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Extracts the last trade price for `pair`
    fn parse_response(
        response: KrakenResponse,
        pair: &str,
        symbol: &CanonicalSymbol,
    ) -> Result<String, SourceError> {
        if !response.error.is_empty() {
            return Err(SourceError::remote(200, response.error.join(", ")));
        }

        response
            .result
            .get(pair)
            .and_then(|ticker| ticker.c.first())
            .cloned()
            .ok_or_else(|| SourceError::price_not_found(symbol.as_str()))
    }

    fn decode_error(body: &str) -> Option<String> {
        serde_json::from_str::<KrakenResponse>(body)
            .ok()
            .filter(|response| !response.error.is_empty())
            .map(|response| response.error.join(", "))
    }
}

#[async_trait]
impl PriceSource for KrakenSource {
    async fn fetch(&self, symbol: &CanonicalSymbol) -> Result<String, SourceError> {
        let pair = symbols::kraken_pair(symbol)
            .ok_or_else(|| SourceError::unsupported(self.exchange_name(), symbol.as_str()))?;

        let url = format!("{}{}", self.base_url, KRAKEN_TICKER_ENDPOINT);
        tracing::debug!(url = %url, pair, "Fetching price from Kraken");

        let request = self.client.get(&url).query(&[("pair", pair)]);
        let response: KrakenResponse =
            get_json(request, self.exchange_name(), Self::decode_error).await?;

        Self::parse_response(response, pair, symbol)
    }

    fn exchange_name(&self) -> &'static str {
        "Kraken"
    }
}
