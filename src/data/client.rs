use crate::{
    config::AppConfig,
    data::{
        fetch::parse_ohlc, orderbook::parse_depth, DataSource, DepthSnapshot, InstrumentId, Sample,
    },
    error::DataError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const KRAKEN_API: &str = "https://api.kraken.com/0/public";

/// Daily candles.
const OHLC_INTERVAL_MINUTES: &str = "1440";

#[derive(Debug, Clone)]
pub struct KrakenClient {
    http: Client,
    base_url: String,
    depth_levels: usize,
}

impl KrakenClient {
    pub fn new(config: &AppConfig) -> Result<Self, DataError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: KRAKEN_API.to_string(),
            depth_levels: config.depth_levels,
        })
    }

    async fn get_public(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, DataError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?query, "kraken request");
        let body = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        pair_result(body)
    }
}

#[async_trait]
impl DataSource for KrakenClient {
    async fn fetch_series(
        &self,
        instrument: &InstrumentId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Sample>, DataError> {
        let since = since.timestamp().to_string();
        let rows = self
            .get_public(
                "OHLC",
                &[
                    ("pair", instrument.kraken_pair()),
                    ("interval", OHLC_INTERVAL_MINUTES),
                    ("since", since.as_str()),
                ],
            )
            .await?;
        parse_ohlc(&rows)
    }

    async fn fetch_depth(&self, instrument: &InstrumentId) -> Result<DepthSnapshot, DataError> {
        let count = self.depth_levels.to_string();
        let book = self
            .get_public("Depth", &[("pair", instrument.kraken_pair()), ("count", count.as_str())])
            .await?;
        parse_depth(&book)
    }
}

/// Unwraps Kraken's `{"error": [..], "result": {<pair>: .., "last": ..}}` envelope
/// down to the entry for the requested pair.
fn pair_result(mut body: Value) -> Result<Value, DataError> {
    if let Some(errors) = body.get("error").and_then(|e| e.as_array()) {
        if !errors.is_empty() {
            let messages: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
            return Err(DataError::malformed(format!("kraken: {}", messages.join(", "))));
        }
    }

    let result = body
        .get_mut("result")
        .and_then(|r| r.as_object_mut())
        .ok_or_else(|| DataError::malformed("response has no result object"))?;

    let key = result
        .keys()
        .find(|k| k.as_str() != "last")
        .cloned()
        .ok_or_else(|| DataError::malformed("result has no pair entry"))?;

    result
        .remove(&key)
        .ok_or_else(|| DataError::malformed("result has no pair entry"))
}
