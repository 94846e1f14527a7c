use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::exchanges::Registry;
use crate::util;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// This is the top-level configuration structure loaded from
// `config.json`.
//
// It defines:
// - The exchanges to poll
// - The trading pairs to poll on every exchange
// - The polling cadence and per-request timeout
//
// The configuration is read once at startup and never changes
// for the process lifetime.
//
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Exchange identifiers (e.g. "kraken", "gateio")
    pub exchanges: Vec<String>,

    /// Trading pairs in normalized form BASE/QUOTE
    /// Example: "ETH/BTC", "BTC/USDT"
    pub pairs: Vec<String>,

    /// Delay between polling cycles, in seconds
    #[serde(default = "default_poll_delay_secs")]
    pub poll_delay_secs: u64,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_poll_delay_secs() -> u64 {
    120
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    /// Built-in polling set used when no `config.json` is present.
    fn default() -> Self {
        Self {
            exchanges: ["kraken", "coinbase", "gateio", "okx"]
                .map(String::from)
                .to_vec(),
            pairs: ["ETH/BTC", "ETH/USDT", "BTC/USDT", "ADA/BTC"]
                .map(String::from)
                .to_vec(),
            poll_delay_secs: default_poll_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Validates the configuration semantics.
    ///
    /// Fails fast at startup on:
    /// - Empty exchange or pair lists
    /// - Duplicate exchange or pair entries
    /// - Exchange identifiers the registry does not know
    /// - Pairs not in BASE/QUOTE form
    ///
    /// Unknown exchanges are a configuration error, not a runtime
    /// fetch error: a name the registry cannot resolve would fail
    /// on every single cycle, so it is rejected here instead.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.exchanges.is_empty(), "no exchanges configured");
        anyhow::ensure!(!self.pairs.is_empty(), "no pairs configured");
        anyhow::ensure!(self.poll_delay_secs > 0, "poll delay must be positive");

        for name in &self.exchanges {
            anyhow::ensure!(
                Registry::is_supported(name),
                "unsupported exchange '{name}'"
            );
        }

        for pair in &self.pairs {
            anyhow::ensure!(
                util::is_valid_pair(pair),
                "malformed pair '{pair}', expected BASE/QUOTE"
            );
        }

        // Both lists are sets: a duplicate entry would spawn a second
        // fetcher for the same (exchange, pair) and put two quotes for
        // one combination into the snapshot.
        let distinct_exchanges: HashSet<&str> =
            self.exchanges.iter().map(String::as_str).collect();
        anyhow::ensure!(
            distinct_exchanges.len() == self.exchanges.len(),
            "duplicate exchange in configuration"
        );

        let distinct_pairs: HashSet<&str> =
            self.pairs.iter().map(String::as_str).collect();
        anyhow::ensure!(
            distinct_pairs.len() == self.pairs.len(),
            "duplicate pair in configuration"
        );

        Ok(())
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.poll_delay_secs, 120);
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_exchange_fails_at_load_time() {
        let cfg = Config {
            exchanges: vec!["bitfinexx".into()],
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("bitfinexx"));
    }

    #[test]
    fn duplicate_exchange_fails_at_load_time() {
        let cfg = Config {
            exchanges: vec!["kraken".into(), "kraken".into()],
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate exchange"));
    }

    #[test]
    fn duplicate_pair_fails_at_load_time() {
        let cfg = Config {
            pairs: vec!["ETH/BTC".into(), "BTC/USDT".into(), "ETH/BTC".into()],
            ..Config::default()
        };
        let err = cfg.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate pair"));
    }

    #[test]
    fn malformed_pair_fails_at_load_time() {
        let cfg = Config {
            pairs: vec!["ETHBTC".into()],
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let cfg: Config = serde_json::from_str(
            r#"{"exchanges": ["kraken"], "pairs": ["ETH/BTC"]}"#,
        )
        .unwrap();
        assert_eq!(cfg.poll_delay_secs, 120);
        assert_eq!(cfg.request_timeout_secs, 30);
        cfg.validate().unwrap();
    }
}
