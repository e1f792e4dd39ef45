//! Exchange price source implementations

pub mod binance;
pub mod coinbase;
pub mod coingecko;
pub mod http;
pub mod kraken;

pub use binance::BinanceSource;
pub use coinbase::CoinbaseSource;
pub use coingecko::CoinGeckoSource;
pub use http::build_client;
pub use kraken::KrakenSource;
