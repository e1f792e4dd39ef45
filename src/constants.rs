//! Constants for the spot price aggregator
//!
//! Exchange endpoints, timeouts and response placeholders are centralized
//! here. Only the listening address is read from the environment (see
//! [`crate::config`]).

/// HTTP request timeout for a single exchange call (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Upper bound on how long the aggregator waits for one source (in seconds)
///
/// Slightly above the HTTP timeout so transport timeouts surface as
/// transport errors, while a source that never yields still gets cut off.
pub const SOURCE_TIMEOUT_SECS: u64 = 12;

/// Price text reported in place of a failed source's quote
pub const FETCH_FAILED_PLACEHOLDER: &str = "Error fetching price";

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 8080;

/// Binance API base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Binance ticker price endpoint
pub const BINANCE_TICKER_ENDPOINT: &str = "/api/v3/ticker/price";

/// Quote asset appended to the canonical symbol for Binance pairs
pub const BINANCE_QUOTE_ASSET: &str = "USDT";

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/api/v3/simple/price";

/// Kraken API base URL
pub const KRAKEN_API_URL: &str = "https://api.kraken.com";

/// Kraken public ticker endpoint
pub const KRAKEN_TICKER_ENDPOINT: &str = "/0/public/Ticker";

/// Coinbase API base URL
pub const COINBASE_API_URL: &str = "https://api.coinbase.com";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "spot-price-aggregator/0.1.0";

/// Largest exchange response body read into memory (in bytes)
pub const MAX_RESPONSE_BODY_BYTES: usize = 1024 * 1024;

/// Maximum number of characters of a raw error body kept in error messages
pub const MAX_ERROR_BODY_CHARS: usize = 256;
