use serde::{Serialize, Deserialize};

// ------------------------------------------------------------
// Ticker
// ------------------------------------------------------------
//
// Raw best ask/bid as returned by a single exchange for a
// single trading pair.
//
// This is the only value an `ExchangeClient` produces. Adapters
// are responsible for parsing exchange-specific payloads into
// this shape.
//
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticker {
    /// Best (lowest) ask price
    pub ask: f64,

    /// Best (highest) bid price
    pub bid: f64,
}

// ------------------------------------------------------------
// PriceQuote
// ------------------------------------------------------------
//
// One successfully fetched ticker, tagged with its origin.
//
// LIFETIME:
// - Produced exactly once per successful fetch
// - Never mutated after creation
// - Owned by the cycle's snapshot, dropped with it before the
//   next cycle starts
//
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PriceQuote {
    /// Exchange identifier (e.g. "kraken", "coinbase")
    pub exchange: String,

    /// Trading pair in normalized internal format
    /// Example: "ETH/BTC", "BTC/USDT"
    pub pair: String,

    /// Best ask at fetch time
    pub ask: f64,

    /// Best bid at fetch time
    pub bid: f64,
}

/// Selects which side of a quote a report is sorted and printed by.
///
/// The reporter runs once per variant against the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Ask,
    Bid,
}

impl PriceField {
    /// Header / section label used in report output.
    pub fn label(self) -> &'static str {
        match self {
            PriceField::Ask => "ASK",
            PriceField::Bid => "BID",
        }
    }

    /// Extracts the selected side from a quote.
    pub fn value(self, quote: &PriceQuote) -> f64 {
        match self {
            PriceField::Ask => quote.ask,
            PriceField::Bid => quote.bid,
        }
    }
}
