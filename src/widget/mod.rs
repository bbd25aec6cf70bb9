//! Stock entities.
//!
//! Ready-made [`Drawable`](crate::scene::Drawable) +
//! [`Physical`](crate::scene::Physical) building blocks:
//!
//! - [`Rectangle`]: a solid block of background color
//! - [`Text`]: a line of styled text
//!
//! # Example
//!
//! ```rust,ignore
//! use termstage::{Color, Level, Rectangle, Text};
//!
//! let mut level = Level::with_color(Color::Black);
//! level.add_entity(Box::new(Rectangle::new(0, 0, 10, 1, Color::White)));
//! level.add_entity(Box::new(Text::new(0, 2, "hello", Color::Green, Color::Default)));
//! ```

mod rectangle;
mod text;

pub use rectangle::Rectangle;
pub use text::Text;
