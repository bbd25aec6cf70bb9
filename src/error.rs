//! Error types for termstage.
//!
//! Only startup failures are returned as errors. Once the frame loop is
//! running, backend failures travel as [`Event`](crate::Event) data instead.

use thiserror::Error;

/// Errors that can abort [`Game::start`](crate::Game::start).
#[derive(Debug, Error)]
pub enum Error {
    /// IO error from terminal operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `start` was called on a game that is running or already stopped.
    #[error("Game already started")]
    AlreadyStarted,

    /// Terminal not available.
    #[error("Terminal not available")]
    TerminalNotAvailable,
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
