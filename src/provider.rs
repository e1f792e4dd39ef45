//! Source abstraction for fetching spot prices from exchange APIs

use crate::{error::SourceError, types::CanonicalSymbol};
use async_trait::async_trait;

/// Trait for exchange price sources
///
/// Each implementation talks to one exchange (Binance, CoinGecko, Kraken,
/// Coinbase, ...) and performs a single request per call, without retrying.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the current USD price for a symbol
    ///
    /// # Arguments
    /// * `symbol` - The canonical symbol to price
    ///
    /// # Returns
    /// The exchange's price string or an error if the fetch fails
    async fn fetch(&self, symbol: &CanonicalSymbol) -> Result<String, SourceError>;

    /// Returns the display name of the exchange, used in report labels
    fn exchange_name(&self) -> &'static str;
}
