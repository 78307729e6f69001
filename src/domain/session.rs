use crate::domain::identifiers::SessionIdentifiers;
use crate::error::SessionError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which stage of the checkout flow the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    Loading,
    Payment,
    Checking,
    Success,
    Cancelled,
    Timeout,
    Info,
}

impl ViewState {
    pub const ALL: [Self; 7] = [
        Self::Loading,
        Self::Payment,
        Self::Checking,
        Self::Success,
        Self::Cancelled,
        Self::Timeout,
        Self::Info,
    ];

    /// No in-core event leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Payment => "payment",
            Self::Checking => "checking",
            Self::Success => "success",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

/// Everything that can move a session: user commands and timer expirations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    ProgressCompleted,
    Confirm,
    Cancel,
    CountdownExpired,
    Checked,
    Elapsed,
    Retry,
}

impl SessionEvent {
    /// The state this event leads to from `from`, or `None` when the event
    /// is not valid there.
    pub fn next_state(self, from: ViewState) -> Option<ViewState> {
        use SessionEvent::*;
        use ViewState::*;

        match (from, self) {
            (Loading, ProgressCompleted) => Some(Payment),
            (Payment, Confirm) => Some(Checking),
            (Payment, Cancel) => Some(Cancelled),
            (Payment, CountdownExpired) => Some(Timeout),
            (Checking, Checked) => Some(Success),
            (Cancelled, Elapsed) => Some(Info),
            (Timeout, Elapsed) => Some(Info),
            (Timeout, Retry) => Some(Loading),
            (Info, Retry) => Some(Loading),
            _ => None,
        }
    }
}

/// A command the presentation layer may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Confirm,
    Cancel,
    Retry,
}

impl SessionCommand {
    pub fn event(self) -> SessionEvent {
        match self {
            Self::Confirm => SessionEvent::Confirm,
            Self::Cancel => SessionEvent::Cancel,
            Self::Retry => SessionEvent::Retry,
        }
    }
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Retry => "retry",
        };
        f.write_str(name)
    }
}

impl FromStr for SessionCommand {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirm" => Ok(Self::Confirm),
            "cancel" => Ok(Self::Cancel),
            "retry" => Ok(Self::Retry),
            _ => Err(SessionError::UnknownCommand(s.trim().to_string())),
        }
    }
}

/// The single live checkout session.
///
/// Mutated only by the controller; everything else sees clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub state: ViewState,
    #[serde(flatten)]
    pub identifiers: SessionIdentifiers,
    /// Meaningful while `state` is `Loading`.
    pub loading_progress: u8,
    /// Seconds left to pay, meaningful while `state` is `Payment`.
    pub time_left: u32,
}

impl Session {
    pub fn new(identifiers: SessionIdentifiers, countdown_seconds: u32) -> Self {
        Self {
            state: ViewState::Loading,
            identifiers,
            loading_progress: 0,
            time_left: countdown_seconds,
        }
    }

    /// Starts a new attempt: fresh identifiers, progress and countdown reset.
    pub fn restart(&mut self, identifiers: SessionIdentifiers, countdown_seconds: u32) {
        *self = Self::new(identifiers, countdown_seconds);
    }
}
