//! Actor Model: Message-passing between the input thread and the frame loop.
//!
//! This module implements the two threads of a running game, connected by
//! a crossbeam channel:
//! - **Input Actor**: Blocks on the terminal's event source, forwards
//!   converted events to the frame loop
//! - **Game**: Runs the frame loop on the calling thread; ticks entities,
//!   draws the screen and commits it to the backend
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐       Event         ┌──────────────┐   paint   ┌─────────┐
//! │ Input Thread │ ─────────────────▶  │  Frame Loop  │ ────────▶ │ Backend │
//! └──────────────┘   (FIFO channel)    │    (Game)    │           └─────────┘
//!        ▲                             └──────────────┘
//!        │ read                               │ tick / draw
//! ┌──────────────┐                            ▼
//! │ EventSource  │                     ┌──────────────┐
//! └──────────────┘                     │    Screen    │
//!                                      └──────────────┘
//! ```

mod event;
mod game;
mod input;

pub use event::{
    convert_event, Event, EventError, EventKind, Key, KeyChord, KeyModifiers, KeyState, MediaKey,
    ModifierKey, MouseAction, MouseButton, MouseEvent, RawEvent,
};
pub use game::{Game, GameConfig, GameState, IdleStrategy, StopHandle};
pub use input::InputActor;
