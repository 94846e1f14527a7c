use reqwest::StatusCode;
use thiserror::Error;

use crate::schema::Ticker;

/// Classified fetch failure.
///
/// Every error a client can produce maps to exactly one of these
/// variants, and the mapping is idempotent: the same underlying
/// failure shape always classifies the same way.
///
/// All variants are recovered at the fetcher boundary. None of them
/// abort a cycle or reach the collector.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The exchange is temporarily unreachable or erroring server-side.
    #[error("exchange not available")]
    ExchangeUnavailable,

    /// No response within the client's request timeout.
    #[error("request timeout")]
    RequestTimeout,

    /// The exchange does not list the requested pair.
    #[error("unsupported pair")]
    UnsupportedPair,

    /// Any failure the taxonomy does not cover.
    #[error("{0}")]
    Other(String),
}

/// ExchangeClient is the abstraction layer between:
/// - The generic polling runtime
/// - Exchange-specific REST ticker APIs
///
/// Each exchange implementation must:
/// - Request the public ticker endpoint for a pair
/// - Parse the exchange-specific payload into `Ticker`
/// - Classify failures into `FetchError`
///
/// DESIGN GOALS:
/// - Zero exchange-specific logic outside client implementations
/// - One client module per exchange
/// - Uniform output format across all exchanges
///
/// LIFECYCLE:
/// - One boxed client is acquired per (exchange, pair) fetch and
///   owned by that fetcher task. Dropping it is the release, so the
///   client is released on every exit path: success, classified
///   failure, or task cancellation mid-flight.
///
/// THREAD SAFETY:
/// - Must be Send + Sync
///
#[async_trait::async_trait]
pub trait ExchangeClient: Send + Sync {

    /// Returns the canonical exchange name.
    ///
    /// CONTRACT:
    /// - Must match the identifier used in configuration and in the
    ///   registry. Used for logging and quote tagging.
    ///
    fn name(&self) -> &'static str;

    /// Fetches the current best ask/bid for a pair.
    ///
    /// PARAMETERS:
    /// - `pair`: internal format "BASE/QUOTE"; implementations
    ///   convert via `util::symbol_to_exchange`
    ///
    /// IMPORTANT:
    /// - This function must NEVER panic
    /// - Failures must be classified, not swallowed
    ///
    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker, FetchError>;
}

/// ClientFactory hands out exchange clients by identifier.
///
/// The production implementation is the registry in
/// `exchanges::Registry`; tests substitute scripted factories.
///
/// CONTRACT:
/// - `acquire` returns `None` for unknown identifiers. Only a
///   successfully acquired client is ever released (dropped) —
///   a failed acquisition has nothing to release.
///
pub trait ClientFactory: Send + Sync {
    fn acquire(&self, exchange: &str) -> Option<Box<dyn ExchangeClient>>;
}

/// Classify a reqwest transport error.
///
/// - Timeout            -> RequestTimeout
/// - Connect failure    -> ExchangeUnavailable
/// - Anything else      -> Other
pub fn classify_transport(err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::RequestTimeout
    } else if err.is_connect() {
        FetchError::ExchangeUnavailable
    } else {
        FetchError::Other(err.to_string())
    }
}

/// Classify a non-success HTTP status.
///
/// - 5xx / 429          -> ExchangeUnavailable (exchange-side trouble)
/// - 404 / 400          -> UnsupportedPair (ticker endpoints answer
///                         these for unknown symbols)
/// - Anything else      -> Other
pub fn classify_status(status: StatusCode) -> FetchError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        FetchError::ExchangeUnavailable
    } else if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
        FetchError::UnsupportedPair
    } else {
        FetchError::Other(format!("unexpected HTTP status {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_is_stable() {
        for _ in 0..2 {
            assert!(matches!(
                classify_status(StatusCode::INTERNAL_SERVER_ERROR),
                FetchError::ExchangeUnavailable
            ));
            assert!(matches!(
                classify_status(StatusCode::BAD_GATEWAY),
                FetchError::ExchangeUnavailable
            ));
            assert!(matches!(
                classify_status(StatusCode::TOO_MANY_REQUESTS),
                FetchError::ExchangeUnavailable
            ));
            assert!(matches!(
                classify_status(StatusCode::NOT_FOUND),
                FetchError::UnsupportedPair
            ));
            assert!(matches!(
                classify_status(StatusCode::BAD_REQUEST),
                FetchError::UnsupportedPair
            ));
            assert!(matches!(
                classify_status(StatusCode::IM_A_TEAPOT),
                FetchError::Other(_)
            ));
        }
    }
}
