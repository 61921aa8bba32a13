use crate::{data::InstrumentId, error::InputError};

/// Where control goes after leaving a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Stocks,
    Crypto,
    Quit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        match input.trim().to_uppercase().as_str() {
            "S" => Ok(MenuChoice::Stocks),
            "C" => Ok(MenuChoice::Crypto),
            "Q" => Ok(MenuChoice::Quit),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSelection {
    Pair(InstrumentId),
    Back,
}

impl PairSelection {
    /// Parses a 1-based index into `pairs`, or `q`.
    pub fn parse(input: &str, pairs: &[InstrumentId]) -> Result<Self, InputError> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(PairSelection::Back);
        }

        let choice: usize = input
            .parse()
            .map_err(|_| InputError::UnknownCommand(input.to_string()))?;

        choice
            .checked_sub(1)
            .and_then(|idx| pairs.get(idx))
            .cloned()
            .map(PairSelection::Pair)
            .ok_or(InputError::OutOfRange { max: pairs.len() })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveCommand {
    Switch(InstrumentId),
    Back,
    Exit,
}

impl LiveCommand {
    pub fn parse(input: &str, pairs: &[InstrumentId]) -> Result<Self, InputError> {
        let instrument = InstrumentId::new(input);
        match instrument.as_str() {
            "Q" => Ok(LiveCommand::Back),
            "X" => Ok(LiveCommand::Exit),
            _ if pairs.contains(&instrument) => Ok(LiveCommand::Switch(instrument)),
            other => Err(InputError::UnknownPair(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteAction {
    NewTicker,
    Back,
}

impl QuoteAction {
    pub fn parse(input: &str) -> Result<Self, InputError> {
        match input.trim().to_lowercase().as_str() {
            "n" => Ok(QuoteAction::NewTicker),
            "q" => Ok(QuoteAction::Back),
            other => Err(InputError::UnknownCommand(other.to_string())),
        }
    }
}
