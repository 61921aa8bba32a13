//! Instrument selection and live-view lifecycle.

use crate::{
    command::{Flow, LiveCommand},
    config::AppConfig,
    console::Console,
    data::{DataSource, InstrumentId, Sample},
    error::SessionError,
    refresh::{LoopId, RefreshHandle, RefreshLoop},
    ui::{RenderTarget, TerminalSize},
};
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub const LIVE_PROMPT: &str =
    "Enter a new pair (e.g., BTCUSD), 'q' to go back to pair selection, or 'x' to exit: ";

/// Live view currently on screen.
struct Session<T> {
    instrument: InstrumentId,
    series: Arc<[Sample]>,
    size: TerminalSize,
    refresh: RefreshHandle<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active {
        instrument: InstrumentId,
        loop_id: LoopId,
    },
}

/// Sole owner of the refresh loop: every transition stops the running loop
/// before another is started.
pub struct SessionController<T: RenderTarget> {
    source: Arc<dyn DataSource>,
    refresher: RefreshLoop,
    history: TimeDelta,
    /// Held here while idle, by the refresh task while active.
    target: Option<T>,
    session: Option<Session<T>>,
}

impl<T: RenderTarget> SessionController<T> {
    pub fn new(source: Arc<dyn DataSource>, config: &AppConfig, target: T) -> Self {
        Self {
            refresher: RefreshLoop::new(
                Arc::clone(&source),
                config.refresh_interval,
                config.depth_levels,
            ),
            source,
            history: TimeDelta::days(config.history_days),
            target: Some(target),
            session: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::Idle,
            Some(session) => SessionState::Active {
                instrument: session.instrument.clone(),
                loop_id: session.refresh.id(),
            },
        }
    }

    pub fn instrument(&self) -> Option<&InstrumentId> {
        self.session.as_ref().map(|s| &s.instrument)
    }

    /// Terminal size the active live view was laid out for.
    pub fn size(&self) -> Option<TerminalSize> {
        self.session.as_ref().map(|s| s.size)
    }

    /// Price series cached for the active live view.
    pub fn series(&self) -> Option<&[Sample]> {
        self.session.as_ref().map(|s| &*s.series)
    }

    /// Fetches a fresh series for `instrument` and restarts the live view on it.
    ///
    /// On a fetch error the previous state, including a running loop, is kept.
    pub async fn select(
        &mut self,
        instrument: InstrumentId,
        size: TerminalSize,
    ) -> Result<(), SessionError> {
        let since = Utc::now() - self.history;
        let series: Arc<[Sample]> = self.source.fetch_series(&instrument, since).await?.into();

        let mut target = self.release().await?;
        // Ahead of the loop, and so ahead of the next prompt.
        if let Err(error) = target.begin(size) {
            warn!(%instrument, %error, "failed to prepare render target");
        }
        let refresh = self
            .refresher
            .start(instrument.clone(), Arc::clone(&series), target);

        info!(%instrument, loop_id = %refresh.id(), samples = series.len(), "live view active");
        self.session = Some(Session {
            instrument,
            series,
            size,
            refresh,
        });
        Ok(())
    }

    pub async fn change(
        &mut self,
        instrument: InstrumentId,
        size: TerminalSize,
    ) -> Result<(), SessionError> {
        self.select(instrument, size).await
    }

    /// Rebuilds the live view for the current instrument at `size`.
    pub async fn resize(&mut self, size: TerminalSize) -> Result<(), SessionError> {
        match self.instrument().cloned() {
            Some(instrument) => {
                info!(%instrument, ?size, "terminal resized");
                self.select(instrument, size).await
            }
            None => Ok(()),
        }
    }

    /// Stops the live view, if any, and returns to idle.
    pub async fn exit(&mut self) -> Result<(), SessionError> {
        if self.session.is_some() {
            let target = self.release().await?;
            self.target = Some(target);
            info!("live view closed");
        }
        Ok(())
    }

    /// Stops the active loop and takes back the render target.
    async fn release(&mut self) -> Result<T, SessionError> {
        if let Some(mut session) = self.session.take() {
            if let Some(target) = session.refresh.stop().await? {
                self.target = Some(target);
            }
        }
        self.target.take().ok_or(SessionError::DisplayUnavailable)
    }

    /// Drives the live view until the operator leaves it.
    ///
    /// The terminal size is compared with the live view's layout each time
    /// before the operator is prompted.
    pub async fn run<C>(
        &mut self,
        console: &mut C,
        pairs: &[InstrumentId],
    ) -> Result<Flow, SessionError>
    where
        C: Console + ?Sized,
    {
        loop {
            let Some(baseline) = self.size() else {
                return Ok(Flow::Back);
            };

            let current = console.terminal_size()?;
            if current != baseline {
                if let Some(instrument) = self.instrument() {
                    console.notify(&format!("Fetching data for {instrument}..."));
                }
                match self.resize(current).await {
                    Ok(()) => continue,
                    // Prompt anyway; the rebuild is retried next round.
                    Err(error) => report(console, error)?,
                }
            }

            let Some(line) = console.read_line(LIVE_PROMPT).await? else {
                self.exit().await?;
                return Ok(Flow::Quit);
            };

            match LiveCommand::parse(&line, pairs) {
                Ok(LiveCommand::Back) => {
                    self.exit().await?;
                    return Ok(Flow::Back);
                }
                Ok(LiveCommand::Exit) => {
                    self.exit().await?;
                    return Ok(Flow::Quit);
                }
                Ok(LiveCommand::Switch(instrument)) => {
                    console.notify(&format!("Fetching data for {instrument}..."));
                    let size = console.terminal_size()?;
                    if let Err(error) = self.change(instrument, size).await {
                        report(console, error)?;
                    }
                }
                Err(error) => console.notify(&error.to_string()),
            }
        }
    }
}

/// Shows recoverable data errors to the operator; anything else is returned.
pub fn report<C>(console: &mut C, error: SessionError) -> Result<(), SessionError>
where
    C: Console + ?Sized,
{
    match error {
        SessionError::Data(error) => {
            warn!(%error, "transition aborted");
            console.notify(&format!("Failed to fetch data: {error}"));
            Ok(())
        }
        other => Err(other),
    }
}
