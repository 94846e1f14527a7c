use serde_json::Value;

use crate::{
    util,
    schema::Ticker,
};

use super::client::{ExchangeClient, FetchError, classify_status, classify_transport};

/// Coinbase Exchange public ticker client.
///
/// Unknown products answer HTTP 404, which the shared status
/// classifier already maps to `UnsupportedPair`.
pub struct CoinbaseClient {
    http: reqwest::Client,
}

impl CoinbaseClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl ExchangeClient for CoinbaseClient {

    fn name(&self) -> &'static str {
        "coinbase"
    }

    async fn fetch_ticker(&self, pair: &str) -> Result<Ticker, FetchError> {
        let sym = util::symbol_to_exchange("coinbase", pair);
        let url = format!("https://api.exchange.coinbase.com/products/{sym}/ticker");

        let resp = self.http
            .get(url)
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

        let ask = body
            .get("ask")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("coinbase: missing ask".into()))?;

        let bid = body
            .get("bid")
            .and_then(util::price_from_json)
            .ok_or_else(|| FetchError::Other("coinbase: missing bid".into()))?;

        Ok(Ticker { ask, bid })
    }
}
