use serde_json::Value;

use crate::{
    util,
    schema::Ticker,
};

use super::client::{ExchangeClient, FetchError, classify_status, classify_transport};

const TICKERS_URL: &str = "https://api.gateio.ws/api/v4/spot/tickers";

/// Gate.io public ticker client.
///
/// Protocol notes:
/// - The tickers endpoint always answers with an array, even when
///   filtered to a single currency pair
/// - Unknown pairs answer HTTP 400 (label INVALID_CURRENCY_PAIR),
///   which the shared status classifier maps to `UnsupportedPair`
pub struct GateIoClient {
    http: reqwest::Client,
}

impl GateIoClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl ExchangeClient for GateIoClient {

    fn name(&self) -> &'static str {
        "gateio"
    }

    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker, FetchError> {
        let sym = util::symbol_to_exchange("gateio", pair);

        let resp = self.http
            .get(TICKERS_URL)
            .query(&[("currency_pair", sym.as_str())])
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

        let entry = body
            .get(0)
            .ok_or_else(|| FetchError::Other("gateio: empty ticker list".into()))?;

        let ask = entry
            .get("lowest_ask")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("gateio: missing ask".into()))?;

        let bid = entry
            .get("highest_bid")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("gateio: missing bid".into()))?;

        Ok(Ticker { ask, bid })
    }
}
