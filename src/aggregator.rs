//! Concurrent price aggregation across exchange sources
//!
//! One task is spawned per registered source for every request. Each task
//! owns its own join handle and the handles are joined in registration order,
//! so the report order never depends on completion order and no result
//! container is shared between tasks.

use crate::{
    constants::{FETCH_FAILED_PLACEHOLDER, SOURCE_TIMEOUT_SECS},
    error::{ConfigError, SourceError},
    provider::PriceSource,
    providers::{build_client, BinanceSource, CoinGeckoSource, CoinbaseSource, KrakenSource},
    types::{AggregatedReport, CanonicalSymbol, ComponentHealth, HealthStatus, PriceQuote},
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Fan-out/fan-in price aggregator
///
/// # Example
/// ```no_run
/// use spot_price_aggregator::{CanonicalSymbol, PriceAggregator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let aggregator = PriceAggregator::with_default_sources()?;
/// let symbol = CanonicalSymbol::parse("btc").unwrap();
/// for quote in aggregator.aggregate(&symbol).await.prices {
///     println!("{}: {}", quote.source, quote.price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PriceAggregator {
    sources: Vec<Arc<dyn PriceSource>>,
    source_timeout: Duration,
}

impl PriceAggregator {
    /// Creates an aggregator over the given sources
    ///
    /// Report entries follow the order of `sources`.
    pub fn new(sources: Vec<Arc<dyn PriceSource>>) -> Self {
        Self {
            sources,
            source_timeout: Duration::from_secs(SOURCE_TIMEOUT_SECS),
        }
    }

    /// Creates an aggregator over Binance, CoinGecko, Kraken and Coinbase
    pub fn with_default_sources() -> Result<Self, ConfigError> {
        let client = build_client()?;

        Ok(Self::new(vec![
            Arc::new(BinanceSource::new(client.clone())),
            Arc::new(CoinGeckoSource::new(client.clone())),
            Arc::new(KrakenSource::new(client.clone())),
            Arc::new(CoinbaseSource::new(client)),
        ]))
    }

    /// Overrides how long a single source may take
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Names of the registered exchanges, in report order
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.exchange_name()).collect()
    }

    /// Fetches the symbol from every source concurrently
    ///
    /// Never fails: a source that errors, times out or panics is reported with
    /// a placeholder price in its own slot.
    #[tracing::instrument(
        name = "aggregate",
        skip_all,
        fields(symbol = %symbol, request_id = %Uuid::new_v4())
    )]
    pub async fn aggregate(&self, symbol: &CanonicalSymbol) -> AggregatedReport {
        let start = Instant::now();

        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let symbol = symbol.clone();
                let timeout = self.source_timeout;

                tokio::spawn(
                    async move {
                        let started = Instant::now();
                        let result = tokio::time::timeout(timeout, source.fetch(&symbol))
                            .await
                            .unwrap_or_else(|_| Err(SourceError::Timeout(timeout)));
                        (result, started.elapsed())
                    }
                    .in_current_span(),
                )
            })
            .collect();

        let outcomes = join_all(handles).await;

        let mut failed = 0usize;
        let prices = self
            .sources
            .iter()
            .zip(outcomes)
            .map(|(source, outcome)| {
                let exchange = source.exchange_name();
                let price = match outcome {
                    Ok((Ok(price), latency)) => {
                        tracing::debug!(
                            source = exchange,
                            latency_ms = latency.as_millis() as u64,
                            price = %price,
                            "Fetched price"
                        );
                        price
                    }
                    Ok((Err(e), latency)) => {
                        failed += 1;
                        tracing::warn!(
                            source = exchange,
                            latency_ms = latency.as_millis() as u64,
                            kind = e.kind(),
                            error = %e,
                            "Failed to fetch price"
                        );
                        FETCH_FAILED_PLACEHOLDER.to_string()
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::error!(source = exchange, error = %e, "Price task aborted");
                        FETCH_FAILED_PLACEHOLDER.to_string()
                    }
                };
                PriceQuote::new(exchange, symbol, price)
            })
            .collect::<Vec<_>>();

        tracing::info!(
            sources = prices.len(),
            failed,
            latency_ms = start.elapsed().as_millis() as u64,
            "Aggregated prices"
        );

        AggregatedReport { prices }
    }

    /// Reports the aggregator's configuration as a health document
    pub fn health_check(&self) -> ComponentHealth {
        let mut details = std::collections::HashMap::new();
        details.insert(
            "sources".to_string(),
            serde_json::json!(self.source_names()),
        );
        details.insert(
            "source_timeout_ms".to_string(),
            serde_json::json!(self.source_timeout.as_millis() as u64),
        );

        let (status, message) = if self.sources.is_empty() {
            (
                HealthStatus::Unhealthy,
                "No price sources registered".to_string(),
            )
        } else {
            (
                HealthStatus::Healthy,
                format!("{} price sources registered", self.sources.len()),
            )
        };

        ComponentHealth {
            name: "price_aggregator".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::{MockOutcome, MockSource};
    use async_trait::async_trait;

    fn sym(raw: &str) -> CanonicalSymbol {
        CanonicalSymbol::parse(raw).unwrap()
    }

    fn healthy_sources() -> Vec<Arc<dyn PriceSource>> {
        vec![
            Arc::new(MockSource::price("Binance", "67012.34000000")),
            Arc::new(MockSource::price("CoinGecko", "67010.12")),
            Arc::new(MockSource::price("Kraken", "67005.10000")),
            Arc::new(MockSource::price("Coinbase", "67011.5")),
        ]
    }

    struct PanickingSource;

    #[async_trait]
    impl PriceSource for PanickingSource {
        async fn fetch(&self, _symbol: &CanonicalSymbol) -> Result<String, SourceError> {
            panic!("source blew up");
        }

        fn exchange_name(&self) -> &'static str {
            "Panicky"
        }
    }

    #[tokio::test]
    async fn test_report_has_one_entry_per_source_in_order() {
        let aggregator = PriceAggregator::new(healthy_sources());

        let report = aggregator.aggregate(&sym("btc")).await;

        let labels: Vec<_> = report.prices.iter().map(|q| q.source.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Binance (BTC)",
                "CoinGecko (BTC)",
                "Kraken (BTC)",
                "Coinbase (BTC)"
            ]
        );
        for quote in &report.prices {
            assert_ne!(quote.price, FETCH_FAILED_PLACEHOLDER);
            assert!(quote.price.parse::<f64>().is_ok());
        }
    }

    #[tokio::test]
    async fn test_single_failure_is_isolated() {
        let aggregator = PriceAggregator::new(vec![
            Arc::new(MockSource::price("Binance", "1.0")),
            Arc::new(MockSource::failing("CoinGecko")),
            Arc::new(MockSource::price("Kraken", "3.0")),
            Arc::new(MockSource::price("Coinbase", "4.0")),
        ]);

        let report = aggregator.aggregate(&sym("ETH")).await;

        let prices: Vec<_> = report.prices.iter().map(|q| q.price.as_str()).collect();
        assert_eq!(prices, vec!["1.0", FETCH_FAILED_PLACEHOLDER, "3.0", "4.0"]);
        assert_eq!(report.prices[1].source, "CoinGecko (ETH)");
    }

    #[tokio::test]
    async fn test_unsupported_symbol_keeps_its_slot() {
        let aggregator = PriceAggregator::new(vec![
            Arc::new(MockSource::with_outcome(
                "Binance",
                MockOutcome::Remote(400, "-1121: Invalid symbol.".into()),
            )),
            Arc::new(MockSource::with_outcome("Kraken", MockOutcome::Unsupported)),
        ]);

        let report = aggregator.aggregate(&sym("foo")).await;

        assert_eq!(report.len(), 2);
        assert_eq!(report.prices[0].source, "Binance (FOO)");
        assert_eq!(report.prices[1].source, "Kraken (FOO)");
        assert!(report
            .prices
            .iter()
            .all(|q| q.price == FETCH_FAILED_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_every_source_gets_the_normalized_symbol() {
        let first = MockSource::price("Binance", "1");
        let second = MockSource::price("Coinbase", "2");
        let (first_calls, second_calls) = (first.calls(), second.calls());
        let aggregator = PriceAggregator::new(vec![Arc::new(first), Arc::new(second)]);

        let lower = aggregator.aggregate(&sym("btc")).await;
        let upper = aggregator.aggregate(&sym("BTC")).await;

        assert_eq!(lower, upper);
        assert_eq!(*first_calls.lock().unwrap(), vec!["BTC", "BTC"]);
        assert_eq!(*second_calls.lock().unwrap(), vec!["BTC", "BTC"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_tracks_slowest_source() {
        let aggregator = PriceAggregator::new(vec![
            Arc::new(MockSource::price("Binance", "1").with_delay(Duration::from_millis(100))),
            Arc::new(MockSource::price("CoinGecko", "2").with_delay(Duration::from_millis(400))),
            Arc::new(MockSource::price("Kraken", "3").with_delay(Duration::from_millis(200))),
            Arc::new(MockSource::price("Coinbase", "4").with_delay(Duration::from_millis(300))),
        ]);

        let start = Instant::now();
        let report = aggregator.aggregate(&sym("SOL")).await;
        let elapsed = start.elapsed();

        assert_eq!(report.len(), 4);
        assert!(elapsed >= Duration::from_millis(400));
        assert!(elapsed < Duration::from_millis(1000), "took {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out_in_its_slot() {
        let aggregator = PriceAggregator::new(vec![
            Arc::new(MockSource::price("Binance", "1")),
            Arc::new(MockSource::price("Kraken", "3").with_delay(Duration::from_secs(600))),
            Arc::new(MockSource::price("Coinbase", "4")),
        ])
        .with_source_timeout(Duration::from_secs(2));

        let start = Instant::now();
        let report = aggregator.aggregate(&sym("DOGE")).await;

        assert!(start.elapsed() < Duration::from_secs(3));
        let prices: Vec<_> = report.prices.iter().map(|q| q.price.as_str()).collect();
        assert_eq!(prices, vec!["1", FETCH_FAILED_PLACEHOLDER, "4"]);
    }

    #[tokio::test]
    async fn test_panicking_source_is_contained() {
        let aggregator = PriceAggregator::new(vec![
            Arc::new(PanickingSource),
            Arc::new(MockSource::price("Coinbase", "4")),
        ]);

        let report = aggregator.aggregate(&sym("BTC")).await;

        assert_eq!(report.prices[0].source, "Panicky (BTC)");
        assert_eq!(report.prices[0].price, FETCH_FAILED_PLACEHOLDER);
        assert_eq!(report.prices[1].price, "4");
    }

    #[test]
    fn test_health_check() {
        let health = PriceAggregator::new(healthy_sources()).health_check();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(
            health.details["sources"],
            serde_json::json!(["Binance", "CoinGecko", "Kraken", "Coinbase"])
        );

        let health = PriceAggregator::new(Vec::new()).health_check();
        assert_eq!(health.status, HealthStatus::Unhealthy);
    }
}
