use crate::domain::ports::RandomSource;
use crate::error::{Result, SessionError};
use std::time::Duration;

/// How long a timer waits: either a fixed duration or a uniform draw.
///
/// Only the checked constructors build one, so every `Delay` is at least
/// one millisecond long and every range is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delay(Spread);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spread {
    Fixed(Duration),
    /// Drawn from `[min, max)` with millisecond granularity.
    Uniform { min: Duration, max: Duration },
}

impl Delay {
    pub fn fixed(value: Duration) -> Result<Self> {
        Self::checked(Spread::Fixed(value), "delay")
    }

    pub fn uniform(min: Duration, max: Duration) -> Result<Self> {
        Self::checked(Spread::Uniform { min, max }, "delay")
    }

    pub fn from_millis(ms: u64) -> Result<Self> {
        Self::fixed(Duration::from_millis(ms))
    }

    pub fn uniform_millis(min: u64, max: u64) -> Result<Self> {
        Self::uniform(Duration::from_millis(min), Duration::from_millis(max))
    }

    /// Draws a concrete duration.
    pub fn sample(&self, random: &mut dyn RandomSource) -> Duration {
        match self.0 {
            Spread::Fixed(value) => value,
            Spread::Uniform { min, max } => {
                Duration::from_millis(random.uniform(as_millis(min), as_millis(max)))
            }
        }
    }

    fn checked(spread: Spread, name: &'static str) -> Result<Self> {
        match spread {
            Spread::Fixed(value) if as_millis(value) == 0 => {
                Err(SessionError::InvalidDuration { name, value })
            }
            Spread::Uniform { min, .. } if as_millis(min) == 0 => {
                Err(SessionError::InvalidDuration { name, value: min })
            }
            Spread::Uniform { min, max } if as_millis(min) >= as_millis(max) => {
                Err(SessionError::InvalidRange { name, min, max })
            }
            _ => Ok(Self(spread)),
        }
    }

    fn scaled(self, factor: f64, name: &'static str) -> Result<Self> {
        let spread = match self.0 {
            Spread::Fixed(value) => Spread::Fixed(scale(value, factor)),
            Spread::Uniform { min, max } => Spread::Uniform {
                min: scale(min, factor),
                max: scale(max, factor),
            },
        };
        Self::checked(spread, name)
    }
}

fn as_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

// Rounds to whole milliseconds; anything under half a millisecond becomes
// zero and is rejected.
fn scale(value: Duration, factor: f64) -> Duration {
    Duration::from_millis((as_millis(value) as f64 * factor).round() as u64)
}

/// Timing constants for one checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Seconds on the payment countdown when the Payment state is entered.
    pub countdown_seconds: u32,
    /// Wall-clock length of one countdown second, drawn when the countdown
    /// starts.
    pub countdown_period: Delay,
    /// Period of each progress tick, drawn per tick.
    pub progress_period: Delay,
    /// Simulated verification time after the user confirms.
    pub checking_delay: Delay,
    /// How long the Cancelled screen stays before Info.
    pub cancelled_delay: Delay,
    /// How long the Timeout screen stays before Info.
    pub timeout_delay: Delay,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 300,
            countdown_period: Delay(Spread::Fixed(Duration::from_millis(1000))),
            progress_period: Delay(Spread::Uniform {
                min: Duration::from_millis(80),
                max: Duration::from_millis(180),
            }),
            checking_delay: Delay(Spread::Uniform {
                min: Duration::from_millis(7000),
                max: Duration::from_millis(10000),
            }),
            cancelled_delay: Delay(Spread::Fixed(Duration::from_millis(10000))),
            timeout_delay: Delay(Spread::Fixed(Duration::from_millis(180000))),
        }
    }
}

impl SessionConfig {
    /// Delays are checked when they are built; only the countdown length
    /// is left to check here.
    pub fn validate(&self) -> Result<()> {
        if self.countdown_seconds == 0 {
            return Err(SessionError::InvalidCountdown);
        }
        Ok(())
    }

    /// Multiplies every duration by `factor`, leaving the countdown length
    /// in seconds untouched.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(SessionError::InvalidTimeScale(factor));
        }
        let scaled = Self {
            countdown_seconds: self.countdown_seconds,
            countdown_period: self.countdown_period.scaled(factor, "countdown_period")?,
            progress_period: self.progress_period.scaled(factor, "progress_period")?,
            checking_delay: self.checking_delay.scaled(factor, "checking_delay")?,
            cancelled_delay: self.cancelled_delay.scaled(factor, "cancelled_delay")?,
            timeout_delay: self.timeout_delay.scaled(factor, "timeout_delay")?,
        };
        scaled.validate()?;
        Ok(scaled)
    }
}
