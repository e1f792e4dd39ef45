//! # Spot Price Aggregator
//!
//! Queries several cryptocurrency exchanges concurrently for the USD price of
//! a ticker and reports every exchange's answer, or a placeholder for the
//! ones that failed, in a fixed order.
//!
//! ## Usage
//!
//! ```no_run
//! use spot_price_aggregator::{CanonicalSymbol, PriceAggregator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = PriceAggregator::with_default_sources()?;
//! let symbol = CanonicalSymbol::parse("eth").unwrap();
//!
//! let report = aggregator.aggregate(&symbol).await;
//! for quote in report.prices {
//!     println!("{}: {}", quote.source, quote.price);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! GET /price/{symbol}
//!     ↓
//! PriceAggregator (one task per source)
//!     ↓
//! Binance | CoinGecko | Kraken | Coinbase
//!     ↓
//! {"prices": [...]} in registration order
//! ```
//!
//! ## Adding New Sources
//!
//! 1. Implement the `PriceSource` trait in `src/providers/`
//! 2. If the exchange needs its own symbol names, extend `symbols::SYMBOL_TABLE`
//! 3. Register the source in `PriceAggregator::with_default_sources`

pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod provider;
pub mod providers;
pub mod server;
pub mod symbols;
pub mod types;

// Re-export commonly used types
pub use aggregator::PriceAggregator;
pub use config::ServerConfig;
pub use error::{ApiError, ConfigError, SourceError};
pub use provider::PriceSource;
pub use server::app_router;
pub use types::{AggregatedReport, CanonicalSymbol, ComponentHealth, HealthStatus, PriceQuote};
