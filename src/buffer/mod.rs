//! Buffer module: the character-cell grid entities draw into.
//!
//! This module contains:
//! - [`Cell`]: a character with foreground and background attributes
//! - [`Buffer`]: a grid of cells representing the terminal screen
//! - [`Attr`], [`Color`], [`Rgb`], [`Modifiers`]: cell styling
//! - [`diff`]: ANSI generation used when a frame is committed

mod cell;
#[allow(clippy::module_inception)]
mod buffer;
pub mod diff;

pub use cell::{Attr, Cell, Color, Modifiers, Rgb};
pub use buffer::Buffer;
