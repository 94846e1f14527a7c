use serde_json::Value;

use crate::{
    util,
    schema::Ticker,
};

use super::client::{ExchangeClient, FetchError, classify_status, classify_transport};

const TICKER_URL: &str = "https://www.okx.com/api/v5/market/ticker";

/// OKX public ticker client.
///
/// Protocol quirks:
/// - Application errors come back with HTTP 200 and a non-zero
///   string `code` field
/// - Code 51001 means the instrument does not exist
pub struct OkxClient {
    http: reqwest::Client,
}

impl OkxClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// Maps OKX in-band result codes onto the failure taxonomy.
fn classify_okx_code(code: &str, msg: &str) -> FetchError {
    match code {
        "51001" => FetchError::UnsupportedPair,
        _ => FetchError::Other(format!("okx error {code}: {msg}")),
    }
}

#[async_trait::async_trait]
impl ExchangeClient for OkxClient {

    fn name(&self) -> &'static str {
        "okx"
    }

    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker, FetchError> {
        let sym = util::symbol_to_exchange("okx", pair);

        let resp = self.http
            .get(TICKER_URL)
            .query(&[("instId", sym.as_str())])
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

        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("0");
        if code != "0" {
            let msg = body.get("msg").and_then(Value::as_str).unwrap_or_default();
            return Err(classify_okx_code(code, msg));
        }

        let entry = body
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| FetchError::Other("okx: empty data".into()))?;

        let ask = entry
            .get("askPx")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("okx: missing ask".into()))?;

        let bid = entry
            .get("bidPx")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("okx: missing bid".into()))?;

        Ok(Ticker { ask, bid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_band_codes_classify() {
        assert!(matches!(
            classify_okx_code("51001", "Instrument ID does not exist"),
            FetchError::UnsupportedPair
        ));
        assert!(matches!(
            classify_okx_code("50013", "System busy"),
            FetchError::Other(_)
        ));
    }
}
