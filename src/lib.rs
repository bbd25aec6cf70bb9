//! # Termstage
//!
//! A real-time 2D scene engine for the terminal.
//!
//! Termstage runs a frame loop that turns terminal input into per-entity
//! `tick` calls and per-entity `draw` calls against a character-cell
//! canvas, committing one complete frame to the terminal per iteration.
//!
//! ## Core Concepts
//!
//! - **Capability traits**: entities implement [`Drawable`], and optionally
//!   [`Physical`] / [`DynamicPhysical`] to take part in collisions
//! - **Levels and camera**: a [`Level`] holds entities and a camera offset
//!   that any entity may move while drawing
//! - **Threaded input**: a dedicated thread reads the terminal and feeds
//!   the loop over a FIFO channel, one event per frame
//! - **Pluggable backends**: [`CrosstermBackend`] for the real terminal,
//!   [`HeadlessBackend`] for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use termstage::{Color, Game, Rectangle};
//!
//! let mut game = Game::new();
//! let mut level = game.create_level(Color::Black);
//! level.add_entity(Box::new(Rectangle::new(2, 2, 4, 2, Color::Red)));
//! game.set_level(level);
//!
//! // Runs until Ctrl+C
//! game.start()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod error;
pub mod layout;
pub mod scene;
pub mod terminal;
pub mod widget;

// Re-exports for convenience
pub use actor::{Event, EventKind, Game, GameConfig, GameState, IdleStrategy, Key, KeyChord, KeyModifiers, StopHandle};
pub use buffer::{Attr, Buffer, Cell, Color, Modifiers, Rgb};
pub use error::{Error, Result};
pub use layout::Rect;
pub use scene::{Commands, Drawable, DynamicPhysical, EntityId, Level, Physical, Screen};
pub use terminal::{Backend, CrosstermBackend, HeadlessBackend, TerminalConfig};
pub use widget::{Rectangle, Text};
