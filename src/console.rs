use crate::ui::TerminalSize;
use async_trait::async_trait;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Operator-facing side of the terminal.
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and blocks until a line is entered.
    /// Returns `None` once input is closed.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn terminal_size(&self) -> io::Result<TerminalSize>;

    fn notify(&mut self, message: &str);
}

pub struct StdinConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Console for StdinConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }
        self.lines.next_line().await
    }

    fn terminal_size(&self) -> io::Result<TerminalSize> {
        TerminalSize::current()
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}
