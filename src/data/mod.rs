pub mod client;
pub mod fetch;
pub mod instrument;
pub mod orderbook;
pub mod stocks;

pub use client::KrakenClient;
pub use fetch::Sample;
pub use instrument::InstrumentId;
pub use orderbook::{DepthLevel, DepthSnapshot};
pub use stocks::{Fundamentals, Quote, QuoteSource, YahooClient};

use crate::error::DataError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Market data provider backing the live view.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Price history for `instrument` since `since`, ordered by time ascending.
    async fn fetch_series(
        &self,
        instrument: &InstrumentId,
        since: DateTime<Utc>,
    ) -> Result<Vec<Sample>, DataError>;

    async fn fetch_depth(&self, instrument: &InstrumentId) -> Result<DepthSnapshot, DataError>;
}
