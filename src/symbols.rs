//! Static symbol translation tables
//!
//! CoinGecko addresses coins by id and Kraken by its own pair names, so both
//! need a lookup from the canonical ticker. Binance and Coinbase build their
//! pair directly from the ticker and do not appear here.

use crate::types::CanonicalSymbol;

/// Exchange identifiers for one canonical symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Canonical ticker
    pub symbol: &'static str,
    /// CoinGecko coin id
    pub coingecko_id: &'static str,
    /// Kraken USD pair name
    pub kraken_pair: &'static str,
}

/// Supported symbols for exchanges that need translation
pub const SYMBOL_TABLE: &[SymbolEntry] = &[
    SymbolEntry {
        symbol: "BTC",
        coingecko_id: "bitcoin",
        kraken_pair: "XXBTZUSD",
    },
    SymbolEntry {
        symbol: "ETH",
        coingecko_id: "ethereum",
        kraken_pair: "XETHZUSD",
    },
    SymbolEntry {
        symbol: "SOL",
        coingecko_id: "solana",
        kraken_pair: "SOLUSD",
    },
    SymbolEntry {
        symbol: "DOGE",
        coingecko_id: "dogecoin",
        kraken_pair: "XDGUSD",
    },
    SymbolEntry {
        symbol: "SHIB",
        coingecko_id: "shiba-inu",
        kraken_pair: "SHIBUSD",
    },
];

fn lookup(symbol: &CanonicalSymbol) -> Option<&'static SymbolEntry> {
    SYMBOL_TABLE
        .iter()
        .find(|entry| entry.symbol == symbol.as_str())
}

/// Get the CoinGecko coin id for a symbol
pub fn coingecko_id(symbol: &CanonicalSymbol) -> Option<&'static str> {
    lookup(symbol).map(|entry| entry.coingecko_id)
}

/// Get the Kraken pair name for a symbol
pub fn kraken_pair(symbol: &CanonicalSymbol) -> Option<&'static str> {
    lookup(symbol).map(|entry| entry.kraken_pair)
}
