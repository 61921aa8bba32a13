use thiserror::Error;

/// Failure to obtain market data from a provider.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl DataError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        DataError::Malformed(msg.into())
    }
}

/// Operator typed something the current menu does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid choice {0:?}. Please try again.")]
    UnknownCommand(String),

    #[error("Invalid choice. Please enter a number between 1 and {max}.")]
    OutOfRange { max: usize },

    #[error("Unknown pair {0:?}. Please try again.")]
    UnknownPair(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("refresh task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("display surface is unavailable")]
    DisplayUnavailable,
}
