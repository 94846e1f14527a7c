use serde_json::Value;

use crate::{
    util,
    schema::Ticker,
};

use super::client::{ExchangeClient, FetchError, classify_status, classify_transport};

const TICKER_URL: &str = "https://api.kraken.com/0/public/Ticker";

/// Kraken public ticker client.
///
/// Protocol quirks:
/// - Errors are reported through an `error` array with HTTP 200
/// - The `result` map is keyed by Kraken's own pair aliases
///   (e.g. "XETHXXBT" for ETHBTC), so the single entry is taken
///   by position rather than by name
pub struct KrakenClient {
    http: reqwest::Client,
}

impl KrakenClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// Maps Kraken's in-band error strings onto the failure taxonomy.
fn classify_kraken_error(errors: &[Value]) -> FetchError {
    let first = errors
        .first()
        .and_then(Value::as_str)
        .unwrap_or_default();

    if first.contains("Unknown asset pair") {
        FetchError::UnsupportedPair
    } else if first.starts_with("EService:") {
        FetchError::ExchangeUnavailable
    } else {
        FetchError::Other(format!("kraken error: {first}"))
    }
}

#[async_trait::async_trait]
impl ExchangeClient for KrakenClient {

    fn name(&self) -> &'static str {
        "kraken"
    }

    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker, FetchError> {
        let sym = util::symbol_to_exchange("kraken", pair);

        let resp = self.http
            .get(TICKER_URL)
            .query(&[("pair", sym.as_str())])
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

        if let Some(errors) = body.get("error").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(classify_kraken_error(errors));
            }
        }

        // Single requested pair -> single result entry
        let entry = body
            .get("result")
            .and_then(Value::as_object)
            .and_then(|m| m.values().next())
            .ok_or_else(|| FetchError::Other("kraken: empty result".into()))?;

        let ask = entry
            .get("a")
            .and_then(|a| a.get(0))
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("kraken: missing ask".into()))?;

        let bid = entry
            .get("b")
            .and_then(|b| b.get(0))
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("kraken: missing bid".into()))?;

        Ok(Ticker { ask, bid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn in_band_errors_classify() {
        let unknown = vec![json!("EQuery:Unknown asset pair")];
        assert!(matches!(
            classify_kraken_error(&unknown),
            FetchError::UnsupportedPair
        ));

        let busy = vec![json!("EService:Busy")];
        assert!(matches!(
            classify_kraken_error(&busy),
            FetchError::ExchangeUnavailable
        ));

        let odd = vec![json!("EGeneral:Invalid arguments")];
        assert!(matches!(classify_kraken_error(&odd), FetchError::Other(_)));
    }
}
