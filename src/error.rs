use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{name} must be a positive duration, got {value:?}")]
    InvalidDuration { name: &'static str, value: Duration },
    #[error("{name} must be a non-empty range, got [{min:?}, {max:?})")]
    InvalidRange {
        name: &'static str,
        min: Duration,
        max: Duration,
    },
    #[error("countdown must start above zero seconds")]
    InvalidCountdown,
    #[error("time scale must be a positive finite number, got {0}")]
    InvalidTimeScale(f64),
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("session runtime has stopped")]
    RuntimeClosed,
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
