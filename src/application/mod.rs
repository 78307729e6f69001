//! Application layer: the session state machine and the task that runs it.
//!
//! `SessionController` is the dispatcher that owns the session and its
//! timers. `SessionRuntime` hosts one controller in a tokio task and talks
//! to callers over channels, Actor-style, so every event is serialized.

pub mod controller;
pub mod runtime;
