use crate::domain::format::{current_time_at, format_countdown};
use crate::domain::session::{Session, ViewState};
use crate::error::Result;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable screens and status lines.
    Text,
    /// One JSON object per snapshot.
    Json,
}

/// Turns session snapshots into terminal output.
///
/// Text mode prints a full screen when the state changes and a short status
/// line on progress and countdown milestones. JSON mode prints every
/// snapshot that differs from the previous one.
pub struct Renderer {
    mode: OutputMode,
    last: Option<Session>,
}

impl Renderer {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, last: None }
    }

    /// Returns the text to print for `session`, if any.
    pub fn render(&mut self, session: &Session, now: DateTime<Utc>) -> Result<Option<String>> {
        if self.last.as_ref() == Some(session) {
            return Ok(None);
        }
        let previous = self.last.replace(session.clone());

        match self.mode {
            OutputMode::Json => Ok(Some(serde_json::to_string(session)?)),
            OutputMode::Text => Ok(match previous {
                Some(previous) if previous.state == session.state => status_line(session),
                _ => Some(screen(session, now)),
            }),
        }
    }
}

pub fn screen(session: &Session, now: DateTime<Utc>) -> String {
    let ids = &session.identifiers;
    match session.state {
        ViewState::Loading => format!(
            "== Checkout (simulated) ==\n\
             Preparing payment details...\n\
             Progress: {}%",
            session.loading_progress
        ),
        ViewState::Payment => format!(
            "== Checkout (simulated): payment ==\n\
             Operation number: {}\n\
             Order number:     {}\n\
             Date and time:    {} (UTC+3)\n\
             Time left:        {}\n\
             Type `confirm` once paid or `cancel` to abandon.",
            ids.operation_number,
            ids.order_number,
            current_time_at(now),
            format_countdown(session.time_left)
        ),
        ViewState::Checking => "== Checking payment ==\n\
             Waiting for the simulated verification..."
            .to_string(),
        ViewState::Success => format!(
            "== Payment confirmed (simulated) ==\n\
             Payment number: {}\n\
             Time:           {} (UTC+3)",
            ids.payment_number,
            current_time_at(now)
        ),
        ViewState::Cancelled => "== Payment cancelled ==\n\
             The operation was cancelled by the user."
            .to_string(),
        ViewState::Timeout => "== Payment cancelled ==\n\
             The payment window expired. Type `retry` to start again."
            .to_string(),
        ViewState::Info => "== Session closed ==\n\
             Type `retry` to start a new payment attempt."
            .to_string(),
    }
}

fn status_line(session: &Session) -> Option<String> {
    match session.state {
        ViewState::Loading if session.loading_progress % 25 == 0 => {
            Some(format!("Progress: {}%", session.loading_progress))
        }
        ViewState::Payment if session.time_left % 60 == 0 || session.time_left <= 10 => {
            Some(format!("Time left: {}", format_countdown(session.time_left)))
        }
        _ => None,
    }
}
