//! Background depth refresh for the live view.
//!
//! A [`RefreshLoop`] spawns one task per live view. The task owns the
//! [`RenderTarget`] for its whole lifetime and hands it back through its
//! join handle, so two loops can never draw at the same time.

use crate::{
    data::{DataSource, InstrumentId, Sample},
    ui::{DepthState, LiveView, RenderTarget},
};
use chrono::Utc;
use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    sync::watch,
    task::{JoinError, JoinHandle},
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};

static NEXT_LOOP_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(u64);

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refresh-{}", self.0)
    }
}

#[derive(Clone)]
pub struct RefreshLoop {
    source: Arc<dyn DataSource>,
    interval: Duration,
    depth_levels: usize,
}

impl RefreshLoop {
    pub fn new(source: Arc<dyn DataSource>, interval: Duration, depth_levels: usize) -> Self {
        Self {
            source,
            interval,
            depth_levels,
        }
    }

    /// Spawns a loop that refreshes depth for `instrument` and redraws it beside
    /// `series` every interval, starting immediately.
    ///
    /// `target` must already be laid out with [`RenderTarget::begin`].
    pub fn start<T: RenderTarget>(
        &self,
        instrument: InstrumentId,
        series: Arc<[Sample]>,
        target: T,
    ) -> RefreshHandle<T> {
        let id = LoopId(NEXT_LOOP_ID.fetch_add(1, Ordering::Relaxed));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let cycle = Cycle {
            id,
            source: Arc::clone(&self.source),
            instrument,
            series,
            depth_levels: self.depth_levels,
        };
        info!(loop_id = %id, instrument = %cycle.instrument, "starting refresh loop");

        let task = tokio::spawn(run(cycle, self.interval, target, shutdown_rx));

        RefreshHandle {
            id,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

/// Exclusive handle to a running refresh loop.
pub struct RefreshHandle<T> {
    id: LoopId,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<T>>,
}

impl<T> RefreshHandle<T> {
    pub fn id(&self) -> LoopId {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Signals the loop and waits for it to exit, returning the render target.
    ///
    /// A cycle already in flight completes first; nothing is drawn once this
    /// returns. Later calls return `Ok(None)`.
    pub async fn stop(&mut self) -> Result<Option<T>, JoinError> {
        let Some(task) = self.task.take() else {
            return Ok(None);
        };

        // Err only if the task already exited, which is fine.
        let _ = self.shutdown.send(true);

        match task.await {
            Ok(target) => {
                info!(loop_id = %self.id, "refresh loop stopped");
                Ok(Some(target))
            }
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => Err(error),
        }
    }
}

impl<T> Drop for RefreshHandle<T> {
    fn drop(&mut self) {
        if self.task.is_some() {
            // Dropping the sender still ends the loop at its next cycle boundary.
            warn!(loop_id = %self.id, "refresh handle dropped without stop");
        }
    }
}

struct Cycle {
    id: LoopId,
    source: Arc<dyn DataSource>,
    instrument: InstrumentId,
    series: Arc<[Sample]>,
    depth_levels: usize,
}

impl Cycle {
    async fn run_once<T: RenderTarget>(&self, target: &mut T) {
        let depth = match self.source.fetch_depth(&self.instrument).await {
            Ok(book) => DepthState::Ready(book),
            Err(error) => {
                warn!(
                    loop_id = %self.id,
                    instrument = %self.instrument,
                    %error,
                    "depth refresh failed"
                );
                DepthState::Unavailable(error.to_string())
            }
        };

        let view = LiveView {
            instrument: &self.instrument,
            series: &self.series,
            depth: &depth,
            depth_levels: self.depth_levels,
            updated_at: Utc::now(),
        };

        if let Err(error) = target.clear().and_then(|()| target.draw(&view)) {
            warn!(loop_id = %self.id, %error, "failed to draw live view");
        }
        debug!(loop_id = %self.id, ready = depth.is_ready(), "refresh cycle complete");
    }
}

async fn run<T: RenderTarget>(
    cycle: Cycle,
    interval: Duration,
    mut target: T,
    mut shutdown: watch::Receiver<bool>,
) -> T {
    // First tick completes immediately.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            // Stop requested, or the handle was dropped.
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        cycle.run_once(&mut target).await;
    }

    debug!(loop_id = %cycle.id, "refresh loop exited");
    target
}
