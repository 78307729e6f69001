//! Terminal shell: reads commands from a line source and renders session
//! snapshots. Presentation only; it never touches the session directly.

pub mod command_reader;
pub mod renderer;
