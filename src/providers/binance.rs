//! Binance price source implementation

use crate::{
    constants::{BINANCE_API_URL, BINANCE_QUOTE_ASSET, BINANCE_TICKER_ENDPOINT},
    error::SourceError,
    provider::PriceSource,
    providers::http::get_json,
    types::CanonicalSymbol,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Binance ticker price response
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    price: Option<String>,
}

/// Binance error body, e.g. `{"code": -1121, "msg": "Invalid symbol."}`
#[derive(Debug, Deserialize)]
struct BinanceErrorBody {
    code: i64,
    msg: String,
}

/// Binance price source
///
/// Builds the trading pair directly from the canonical symbol, so unknown
/// symbols are only rejected remotely.
pub struct BinanceSource {
    client: Client,
    base_url: String,
}

impl BinanceSource {
    /// Creates a new Binance source on the public API
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BINANCE_API_URL)
    }

    /// Creates a Binance source against another host (mirrors, tests)
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn pair(symbol: &CanonicalSymbol) -> String {
        format!("{}{}", symbol, BINANCE_QUOTE_ASSET)
    }

    fn parse_response(
        response: TickerPriceResponse,
        symbol: &CanonicalSymbol,
    ) -> Result<String, SourceError> {
        response
            .price
            .filter(|price| !price.is_empty())
            .ok_or_else(|| SourceError::price_not_found(symbol.as_str()))
    }

    fn decode_error(body: &str) -> Option<String> {
        serde_json::from_str::<BinanceErrorBody>(body)
            .ok()
            .map(|err| format!("{}: {}", err.code, err.msg))
    }
}

#[async_trait]
impl PriceSource for BinanceSource {
    async fn fetch(&self, symbol: &CanonicalSymbol) -> Result<String, SourceError> {
        let url = format!("{}{}", self.base_url, BINANCE_TICKER_ENDPOINT);
        let pair = Self::pair(symbol);
        tracing::debug!(url = %url, pair = %pair, "Fetching price from Binance");

        let request = self.client.get(&url).query(&[("symbol", pair.as_str())]);
        let response: TickerPriceResponse =
            get_json(request, self.exchange_name(), Self::decode_error).await?;

        Self::parse_response(response, symbol)
    }

    fn exchange_name(&self) -> &'static str {
        "Binance"
    }
}
