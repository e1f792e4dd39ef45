//! Types for the spot price aggregator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uppercase ticker symbol as supplied by the caller (e.g. "BTC")
///
/// Not checked against a fixed universe: an unknown symbol is reported by
/// each source individually.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CanonicalSymbol(String);

impl CanonicalSymbol {
    /// Normalizes raw caller input (trimmed, uppercased)
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_uppercase()))
        }
    }

    /// Get the symbol string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CanonicalSymbol {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or("symbol must not be empty")
    }
}

impl fmt::Display for CanonicalSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the aggregated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Label of the form `"<Exchange> (<SYMBOL>)"`
    pub source: String,

    /// Exchange price string, or a placeholder when the fetch failed
    pub price: String,
}

impl PriceQuote {
    /// Create a quote labelled for the given exchange and symbol
    pub fn new(exchange: &str, symbol: &CanonicalSymbol, price: impl Into<String>) -> Self {
        Self {
            source: format!("{} ({})", exchange, symbol),
            price: price.into(),
        }
    }
}

/// Prices from every registered source, in registration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub prices: Vec<PriceQuote>,
}

impl AggregatedReport {
    /// Number of entries in the report
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// True if no source is registered
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Service is operational
    Healthy,
    /// Service is running without any registered source
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}
