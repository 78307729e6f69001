use crate::domain::session::SessionCommand;
use crate::error::{Result, SessionError};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

/// A line typed into the terminal shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Session(SessionCommand),
    Quit,
}

impl FromStr for ShellCommand {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quit" | "exit" => Ok(Self::Quit),
            _ => s.parse().map(Self::Session),
        }
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(command) => write!(f, "{command}"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Reads shell commands from a line-oriented source such as stdin.
///
/// Blank lines are skipped; unrecognized words come back as errors so the
/// caller can report them and keep reading.
pub struct CommandReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily yields one result per non-blank line until the source ends.
    pub fn commands(self) -> impl Iterator<Item = Result<ShellCommand>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(line.parse()),
            Err(e) => Some(Err(SessionError::from(e))),
        })
    }
}
