use crate::data::InstrumentId;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pairs: Vec<InstrumentId>,
    pub refresh_interval: Duration,
    pub history_days: i64,
    pub depth_levels: usize,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pairs: default_pairs(),
            refresh_interval: Duration::from_secs(5),
            history_days: 30,
            depth_levels: 5,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn sanitized(mut self) -> Self {
        if self.pairs.is_empty() {
            self.pairs = default_pairs();
        }

        self.refresh_interval = self.refresh_interval.max(Duration::from_secs(1));
        self.request_timeout = self.request_timeout.max(Duration::from_secs(1));
        // Kraken serves at most 720 candles per OHLC request.
        self.history_days = self.history_days.clamp(1, 720);
        self.depth_levels = self.depth_levels.clamp(1, 25);
        self
    }
}

pub fn default_pairs() -> Vec<InstrumentId> {
    [
        "BTCUSD", "ETHUSD", "XRPUSD", "LTCUSD", "DOTUSD", "ADAUSD", "SOLUSD", "MATICUSD",
        "LINKUSD", "UNIUSD",
    ]
    .into_iter()
    .map(InstrumentId::new)
    .collect()
}
