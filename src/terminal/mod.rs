//! Terminal backends.
//!
//! - [`CrosstermBackend`]: the real terminal, via crossterm
//! - [`HeadlessBackend`]: in-memory, with scripted input

mod backend;
mod headless;

pub use backend::{Backend, CrosstermBackend, CrosstermEvents, EventSource, SourceRead, TerminalConfig};
pub use headless::{HeadlessBackend, HeadlessEvents, HeadlessInput};
