use ratatui::backend::CrosstermBackend;
use std::{io, sync::Arc};
use tickerplot::{
    app::App,
    config::AppConfig,
    console::StdinConsole,
    data::{KrakenClient, YahooClient},
    ui::{TerminalSize, TerminalTarget},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging();

    let config = AppConfig::default().sanitized();
    let source = Arc::new(KrakenClient::new(&config)?);
    let quotes = Arc::new(YahooClient::new(&config)?);

    let size = TerminalSize::current()?;
    let target = TerminalTarget::new(CrosstermBackend::new(io::stdout()), size)?;

    let mut app = App::new(config, source, quotes, target, StdinConsole::new());
    app.run().await?;
    Ok(())
}

/// Logs go to stderr and are off unless `RUST_LOG` asks for them, so they
/// never overwrite the live view.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
