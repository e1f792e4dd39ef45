//! Coinbase price source implementation

use crate::{
    constants::COINBASE_API_URL,
    error::SourceError,
    provider::PriceSource,
    providers::http::get_json,
    types::CanonicalSymbol,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Coinbase spot price response
#[derive(Debug, Deserialize)]
struct SpotPriceResponse {
    data: Option<SpotPriceData>,
}

#[derive(Debug, Deserialize)]
struct SpotPriceData {
    amount: Option<String>,
}

/// Coinbase error bodies: the v2 `errors` list or the newer flat shape
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CoinbaseErrorBody {
    List { errors: Vec<CoinbaseErrorEntry> },
    Flat { error: String, message: String },
}

#[derive(Debug, Deserialize)]
struct CoinbaseErrorEntry {
    id: String,
    message: String,
}

/// Coinbase price source
pub struct CoinbaseSource {
    client: Client,
    base_url: String,
}

impl CoinbaseSource {
    /// Creates a new Coinbase source on the public API
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, COINBASE_API_URL)
    }

    /// Creates a Coinbase source against another host (mirrors, tests)
    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, symbol: &CanonicalSymbol) -> String {
        format!(
            "{}/v2/prices/{}-USD/spot",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        )
    }

    fn parse_response(
        response: SpotPriceResponse,
        symbol: &CanonicalSymbol,
    ) -> Result<String, SourceError> {
        response
            .data
            .and_then(|data| data.amount)
            .filter(|amount| !amount.is_empty())
            .ok_or_else(|| SourceError::price_not_found(symbol.as_str()))
    }

    fn decode_error(body: &str) -> Option<String> {
        match serde_json::from_str::<CoinbaseErrorBody>(body).ok()? {
            CoinbaseErrorBody::List { errors } if !errors.is_empty() => Some(
                errors
                    .iter()
                    .map(|e| format!("{}: {}", e.id, e.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            CoinbaseErrorBody::List { .. } => None,
            CoinbaseErrorBody::Flat { error, message } => Some(format!("{}: {}", error, message)),
        }
    }
}

#[async_trait]
impl PriceSource for CoinbaseSource {
    async fn fetch(&self, symbol: &CanonicalSymbol) -> Result<String, SourceError> {
        let url = self.build_url(symbol);
        tracing::debug!(url = %url, "Fetching price from Coinbase");

        let request = self.client.get(&url);
        let response: SpotPriceResponse =
            get_json(request, self.exchange_name(), Self::decode_error).await?;

        Self::parse_response(response, symbol)
    }

    fn exchange_name(&self) -> &'static str {
        "Coinbase"
    }
}
