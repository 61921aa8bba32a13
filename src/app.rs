use crate::{
    command::{Flow, MenuChoice, PairSelection, QuoteAction},
    config::AppConfig,
    console::Console,
    data::{DataSource, QuoteSource},
    error::SessionError,
    session::{report, SessionController},
    ui::RenderTarget,
};
use std::sync::Arc;
use tracing::{info, warn};

const MAIN_PROMPT: &str = "Type 'S' for stocks, 'C' for crypto, or 'Q' to quit: ";
const TICKER_PROMPT: &str = "Enter a company name or ticker symbol (or 'q' to go back): ";
const QUOTE_PROMPT: &str = "Enter 'n' for a new ticker or 'q' to go back: ";

/// Top-level menus around the live view.
pub struct App<T: RenderTarget, C: Console> {
    config: AppConfig,
    console: C,
    quotes: Arc<dyn QuoteSource>,
    session: SessionController<T>,
}

impl<T: RenderTarget, C: Console> App<T, C> {
    pub fn new(
        config: AppConfig,
        source: Arc<dyn DataSource>,
        quotes: Arc<dyn QuoteSource>,
        target: T,
        console: C,
    ) -> Self {
        let session = SessionController::new(source, &config, target);
        Self {
            config,
            console,
            quotes,
            session,
        }
    }

    pub fn session(&self) -> &SessionController<T> {
        &self.session
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub async fn run(&mut self) -> Result<(), SessionError> {
        loop {
            let Some(line) = self.console.read_line(MAIN_PROMPT).await? else {
                break;
            };

            let flow = match MenuChoice::parse(&line) {
                Ok(MenuChoice::Stocks) => self.stocks().await?,
                Ok(MenuChoice::Crypto) => self.crypto().await?,
                Ok(MenuChoice::Quit) => Flow::Quit,
                Err(error) => {
                    self.console.notify(&error.to_string());
                    Flow::Back
                }
            };

            if flow == Flow::Quit {
                break;
            }
        }

        self.session.exit().await?;
        self.console.notify("Exiting the program...");
        Ok(())
    }

    async fn crypto(&mut self) -> Result<Flow, SessionError> {
        loop {
            self.console.notify("Select a cryptocurrency pair:");
            for (idx, pair) in self.config.pairs.iter().enumerate() {
                self.console.notify(&format!("{}. {}", idx + 1, pair));
            }
            self.console.notify("Type 'q' to go back to the main menu");

            let prompt = format!("Enter your choice (1-{} or 'q'): ", self.config.pairs.len());
            let Some(line) = self.console.read_line(&prompt).await? else {
                return Ok(Flow::Quit);
            };

            let instrument = match PairSelection::parse(&line, &self.config.pairs) {
                Ok(PairSelection::Pair(instrument)) => instrument,
                Ok(PairSelection::Back) => {
                    self.console.notify("Returning to main menu...");
                    return Ok(Flow::Back);
                }
                Err(error) => {
                    self.console.notify(&error.to_string());
                    continue;
                }
            };

            info!(%instrument, "pair selected");
            self.console
                .notify(&format!("Fetching data for {instrument}..."));
            let size = self.console.terminal_size()?;
            if let Err(error) = self.session.select(instrument, size).await {
                report(&mut self.console, error)?;
                continue;
            }

            if self.session.run(&mut self.console, &self.config.pairs).await? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    async fn stocks(&mut self) -> Result<Flow, SessionError> {
        loop {
            let Some(query) = self.console.read_line(TICKER_PROMPT).await? else {
                return Ok(Flow::Quit);
            };
            let query = query.trim();
            if query.eq_ignore_ascii_case("q") {
                return Ok(Flow::Back);
            }
            if query.is_empty() {
                continue;
            }

            let ticker = match self.quotes.search(query).await {
                Ok(Some(ticker)) => ticker,
                Ok(None) => {
                    self.console
                        .notify("Company or ticker not found. Please try again.");
                    continue;
                }
                Err(error) => {
                    warn!(%error, query, "ticker search failed");
                    self.console.notify(&format!("Search failed: {error}"));
                    continue;
                }
            };

            self.console.notify(&format!("Fetching data for {ticker}..."));
            match self.quotes.quote(&ticker).await {
                Ok(quote) => {
                    for line in quote.summary_lines() {
                        self.console.notify(&line);
                    }
                    self.console.notify("");
                }
                Err(error) => {
                    warn!(%error, %ticker, "quote lookup failed");
                    self.console.notify(&format!("Failed to fetch data: {error}"));
                    continue;
                }
            }

            loop {
                let Some(line) = self.console.read_line(QUOTE_PROMPT).await? else {
                    return Ok(Flow::Quit);
                };
                match QuoteAction::parse(&line) {
                    Ok(QuoteAction::NewTicker) => break,
                    Ok(QuoteAction::Back) => return Ok(Flow::Back),
                    Err(error) => self.console.notify(&error.to_string()),
                }
            }
        }
    }
}
