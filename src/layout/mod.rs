//! Layout module: geometry shared by entities and the collision pass.

mod rect;

pub use rect::Rect;
