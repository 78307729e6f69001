//! Domain layer: the session record, its transition table, the timers that
//! drive it and the ports through which time and randomness enter.

pub mod config;
pub mod format;
pub mod identifiers;
pub mod ports;
pub mod session;
pub mod timer;
