//! Scene model: entities, levels and the screen they are drawn on.
//!
//! ```text
//! Screen
//! ├── Buffer            (cell canvas, committed once per frame)
//! ├── Level (optional)  (entities + camera offset + background)
//! └── screen entities   (drawn last, no camera offset)
//! ```

mod commands;
mod entity;
mod level;
mod list;
mod screen;

pub use commands::Commands;
pub use entity::{overlaps, resolve_collisions, Drawable, DynamicPhysical, EntityId, Physical};
pub use level::Level;
pub use screen::Screen;
