#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::{
    collections::{HashSet, VecDeque},
    io,
    sync::{Arc, Mutex},
    time::Duration,
};
use tickerplot::{
    config::AppConfig,
    console::Console,
    data::{
        DataSource, DepthLevel, DepthSnapshot, Fundamentals, InstrumentId, Quote, QuoteSource,
        Sample,
    },
    error::DataError,
    ui::{LiveView, RenderTarget, TerminalSize},
};
use tokio::time::Instant;

pub fn config() -> AppConfig {
    AppConfig::default()
}

pub fn id(symbol: &str) -> InstrumentId {
    InstrumentId::from(symbol)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceCall {
    Series(InstrumentId),
    Depth(InstrumentId, Instant),
}

#[derive(Default)]
struct SourceState {
    calls: Vec<SourceCall>,
    depth_calls: usize,
    failing_depth_calls: HashSet<usize>,
    failing_series: HashSet<InstrumentId>,
}

/// In-memory market data with scripted latency and failures.
#[derive(Default)]
pub struct MockSource {
    state: Mutex<SourceState>,
    depth_latency: Duration,
}

impl MockSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_depth_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            depth_latency: latency,
            ..Self::default()
        })
    }

    /// Fails the `n`th (0-based) depth fetch across all loops.
    pub fn fail_depth_call(&self, n: usize) {
        self.state.lock().unwrap().failing_depth_calls.insert(n);
    }

    pub fn fail_series(&self, instrument: &InstrumentId) {
        self.state
            .lock()
            .unwrap()
            .failing_series
            .insert(instrument.clone());
    }

    pub fn heal_series(&self, instrument: &InstrumentId) {
        self.state.lock().unwrap().failing_series.remove(instrument);
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn series_calls(&self) -> Vec<InstrumentId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::Series(instrument) => Some(instrument),
                SourceCall::Depth(..) => None,
            })
            .collect()
    }

    pub fn depth_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::Depth(_, at) => Some(at),
                SourceCall::Series(_) => None,
            })
            .collect()
    }
}

pub fn series_for(instrument: &InstrumentId) -> Vec<Sample> {
    let base = instrument.as_str().len() as f64 * 1000.0;
    let start = Utc::now() - TimeDelta::days(3);
    (0..3)
        .map(|day| Sample {
            time: start + TimeDelta::days(day),
            price: base + day as f64,
        })
        .collect()
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_series(
        &self,
        instrument: &InstrumentId,
        _since: DateTime<Utc>,
    ) -> Result<Vec<Sample>, DataError> {
        let failing = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(SourceCall::Series(instrument.clone()));
            state.failing_series.contains(instrument)
        };

        if failing {
            return Err(DataError::malformed(format!("no history for {instrument}")));
        }
        Ok(series_for(instrument))
    }

    async fn fetch_depth(&self, instrument: &InstrumentId) -> Result<DepthSnapshot, DataError> {
        let failing = {
            let mut state = self.state.lock().unwrap();
            state
                .calls
                .push(SourceCall::Depth(instrument.clone(), Instant::now()));
            let n = state.depth_calls;
            state.depth_calls += 1;
            state.failing_depth_calls.contains(&n)
        };

        if !self.depth_latency.is_zero() {
            tokio::time::sleep(self.depth_latency).await;
        }

        if failing {
            return Err(DataError::malformed("depth unavailable"));
        }
        Ok(DepthSnapshot {
            bids: vec![DepthLevel { price: 99.0, volume: 1.0 }],
            asks: vec![DepthLevel { price: 101.0, volume: 2.0 }],
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetEvent {
    Begin(TerminalSize),
    Clear,
    Draw {
        instrument: InstrumentId,
        depth_ready: bool,
        samples: usize,
        at: Instant,
    },
}

/// Render target that records what it was asked to do.
#[derive(Clone, Default)]
pub struct RecordingTarget {
    events: Arc<Mutex<Vec<TargetEvent>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TargetEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn draws(&self) -> Vec<(InstrumentId, bool)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TargetEvent::Draw {
                    instrument,
                    depth_ready,
                    ..
                } => Some((instrument, depth_ready)),
                _ => None,
            })
            .collect()
    }

    pub fn draw_count(&self) -> usize {
        self.draws().len()
    }

    pub fn begins(&self) -> Vec<TerminalSize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TargetEvent::Begin(size) => Some(size),
                _ => None,
            })
            .collect()
    }
}

impl RenderTarget for RecordingTarget {
    fn begin(&mut self, size: TerminalSize) -> io::Result<()> {
        self.events.lock().unwrap().push(TargetEvent::Begin(size));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.events.lock().unwrap().push(TargetEvent::Clear);
        Ok(())
    }

    fn draw(&mut self, view: &LiveView<'_>) -> io::Result<()> {
        self.events.lock().unwrap().push(TargetEvent::Draw {
            instrument: view.instrument.clone(),
            depth_ready: view.depth.is_ready(),
            samples: view.series.len(),
            at: Instant::now(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Line(&'static str),
    /// Terminal is resized before the next line is read.
    Resize(TerminalSize),
    /// Time passes while the operator thinks.
    Wait(Duration),
}

/// Console fed from a script; input closes when the script runs out.
pub struct ScriptedConsole {
    steps: VecDeque<Step>,
    size: TerminalSize,
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(size: TerminalSize, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            size,
            prompts: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn lines(size: TerminalSize, lines: &[&'static str]) -> Self {
        Self::new(size, lines.iter().copied().map(Step::Line))
    }

    pub fn noticed(&self, needle: &str) -> bool {
        self.notices.iter().any(|n| n.contains(needle))
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        while let Some(step) = self.steps.pop_front() {
            match step {
                Step::Line(line) => return Ok(Some(line.to_string())),
                Step::Resize(size) => self.size = size,
                Step::Wait(duration) => tokio::time::sleep(duration).await,
            }
        }
        Ok(None)
    }

    fn terminal_size(&self) -> io::Result<TerminalSize> {
        Ok(self.size)
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

#[derive(Default)]
pub struct MockQuotes;

#[async_trait]
impl QuoteSource for MockQuotes {
    async fn search(&self, query: &str) -> Result<Option<String>, DataError> {
        Ok(match query.to_lowercase().as_str() {
            "apple" | "aapl" => Some("AAPL".to_string()),
            _ => None,
        })
    }

    async fn quote(&self, ticker: &str) -> Result<Quote, DataError> {
        Ok(Quote {
            symbol: ticker.to_string(),
            long_name: Some("Apple Inc.".to_string()),
            short_name: None,
            currency: Some("USD".to_string()),
            regular_market_price: Some(190.5),
            chart_previous_close: Some(188.0),
            regular_market_day_high: Some(191.0),
            regular_market_day_low: Some(187.2),
            fifty_two_week_high: Some(199.6),
            fifty_two_week_low: Some(164.1),
            regular_market_volume: Some(48_000_000),
            fundamentals: Fundamentals {
                market_cap: Some(2_950_000_000_000),
                trailing_pe: Some(29.8),
                ..Fundamentals::default()
            },
        })
    }
}
