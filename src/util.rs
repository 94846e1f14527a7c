/// Utility helpers shared by all exchange clients.
///
/// This module contains:
/// - Symbol conversion helpers
///
/// IMPORTANT:
/// - No exchange-specific business logic should live here beyond
///   plain symbol formatting.
/// - This module must remain lightweight and deterministic.
///

/// Convert an internal symbol into the exchange-specific format.
///
/// Input:
/// - exchange: exchange identifier (e.g. "kraken", "gateio")
/// - symbol: internal format "BASE/QUOTE"
///
/// Output:
/// - Exchange-specific symbol representation
///
/// Examples:
/// - ("gateio", "BTC/USDT")   -> "BTC_USDT"
/// - ("kraken", "ETH/BTC")    -> "ETHXBT"
/// - ("coinbase", "BTC/USDT") -> "BTC-USDT"
///
/// DESIGN NOTES:
/// - Centralized symbol conversion avoids duplication across clients.
/// - Keeps configuration files exchange-agnostic.
///
pub fn symbol_to_exchange(exchange: &str, symbol: &str) -> String {
    match exchange {
        "gateio" => symbol.replace('/', "_"),
        // Kraken pair altnames spell Bitcoin as XBT
        "kraken" => symbol.replace("BTC", "XBT").replace('/', ""),
        "okx" | "coinbase" => symbol.replace('/', "-"),
        _ => symbol.to_string(),
    }
}

/// Extract a price from a JSON value that may be either a string
/// (most ticker endpoints) or a bare number.
///
/// Returns `None` for missing, empty or non-numeric values so the
/// caller can classify the payload as malformed.
pub fn price_from_json(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Check that a pair identifier is in the internal "BASE/QUOTE" form.
///
/// Used by config validation to reject malformed pairs at startup
/// instead of producing confusing per-request failures later.
pub fn is_valid_pair(symbol: &str) -> bool {
    match symbol.split_once('/') {
        Some((base, quote)) => {
            !base.is_empty()
                && !quote.is_empty()
                && !quote.contains('/')
                && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '/')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_conversion_per_exchange() {
        assert_eq!(symbol_to_exchange("gateio", "ETH/BTC"), "ETH_BTC");
        assert_eq!(symbol_to_exchange("kraken", "ETH/BTC"), "ETHXBT");
        assert_eq!(symbol_to_exchange("kraken", "BTC/USDT"), "XBTUSDT");
        assert_eq!(symbol_to_exchange("coinbase", "ETH/BTC"), "ETH-BTC");
        assert_eq!(symbol_to_exchange("okx", "BTC/USDT"), "BTC-USDT");
        // Unknown exchanges pass the symbol through unchanged
        assert_eq!(symbol_to_exchange("somewhere", "ETH/BTC"), "ETH/BTC");
    }

    #[test]
    fn price_parsing_accepts_strings_and_numbers() {
        use serde_json::json;

        assert_eq!(price_from_json(&json!("0.0521")), Some(0.0521));
        assert_eq!(price_from_json(&json!(42.5)), Some(42.5));
        assert_eq!(price_from_json(&json!("")), None);
        assert_eq!(price_from_json(&json!(null)), None);
        assert_eq!(price_from_json(&json!(["0.1"])), None);
    }

    #[test]
    fn pair_validation() {
        assert!(is_valid_pair("ETH/BTC"));
        assert!(is_valid_pair("ADA/BTC"));
        assert!(!is_valid_pair("ETHBTC"));
        assert!(!is_valid_pair("/BTC"));
        assert!(!is_valid_pair("ETH/"));
        assert!(!is_valid_pair("ETH/BTC/USD"));
    }
}
