//! Adapters for the domain ports: clocks and random sources.

pub mod clock;
pub mod random;
