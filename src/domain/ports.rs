use std::time::Instant;

/// Source of "now" for every timer the controller arms.
///
/// Production code reads the tokio clock; tests advance a manual one.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

/// Source of every randomized draw: tick periods, delays and identifier
/// characters.
pub trait RandomSource: Send {
    /// Returns a value drawn uniformly from `[low, high)`.
    ///
    /// Callers guarantee `low < high`.
    fn uniform(&mut self, low: u64, high: u64) -> u64;
}

pub type ClockBox = Box<dyn Clock>;
pub type RandomSourceBox = Box<dyn RandomSource>;
