//! Exchange client registry and factory
//!
//! This module provides:
//! - Central registration of all supported exchanges
//! - A factory resolving client instances by name
//!
//! All exchange-specific logic must live in dedicated client modules.
//! The rest of the application must interact exclusively through
//! the `ExchangeClient` trait.

pub mod client;
pub mod kraken;
pub mod coinbase;
pub mod gateio;
pub mod okx;

use std::time::Duration;

use anyhow::Context;

use client::{ClientFactory, ExchangeClient};

/// Central factory / registry for all supported exchanges.
///
/// DESIGN:
/// - Keeps client creation in one place
/// - Avoids string-based dispatch scattered across the codebase
/// - Enables compile-time visibility of supported exchanges
///
/// LIFECYCLE:
/// - One fresh `ExchangeClient` per acquire; the underlying HTTP
///   connection pool is shared, which is a reqwest implementation
///   detail and invisible to callers.
///
/// CONTRACT:
/// - Identifiers must be lowercase and stable, matching the
///   `exchanges` list in configuration. Unknown identifiers are
///   rejected at configuration-load time via `is_supported`.
///
pub struct Registry {
    http: reqwest::Client,
}

/// Exchange identifiers this build knows how to talk to.
pub const SUPPORTED: [&str; 4] = ["kraken", "coinbase", "gateio", "okx"];

impl Registry {
    /// Builds the registry with the given per-request timeout.
    ///
    /// The timeout is what ultimately produces the `RequestTimeout`
    /// classification on slow exchanges.
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http })
    }

    /// Returns whether an exchange identifier is registered.
    ///
    /// Used to fail fast at startup instead of at fetch time.
    pub fn is_supported(name: &str) -> bool {
        SUPPORTED.contains(&name)
    }
}

impl ClientFactory for Registry {
    fn acquire(&self, exchange: &str) -> Option<Box<dyn ExchangeClient>> {
        match exchange {
            "kraken" => Some(Box::new(kraken::KrakenClient::new(self.http.clone()))),
            "coinbase" => Some(Box::new(coinbase::CoinbaseClient::new(self.http.clone()))),
            "gateio" => Some(Box::new(gateio::GateIoClient::new(self.http.clone()))),
            "okx" => Some(Box::new(okx::OkxClient::new(self.http.clone()))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_supported_exchange() {
        let registry = Registry::new(Duration::from_secs(5)).unwrap();
        for name in SUPPORTED {
            assert!(Registry::is_supported(name));
            let client = registry.acquire(name).unwrap();
            assert_eq!(client.name(), name);
        }
    }

    #[test]
    fn unknown_exchange_is_rejected() {
        let registry = Registry::new(Duration::from_secs(5)).unwrap();
        assert!(!Registry::is_supported("mtgox"));
        assert!(registry.acquire("mtgox").is_none());
    }
}
