//! Levels: a world of entities with a camera offset and a background.

use super::entity::{resolve_collisions, Drawable, EntityId};
use super::list::{EntityList, Slot};
use crate::actor::Event;
use crate::buffer::{Cell, Color};

/// A game world.
///
/// Holds entities in insertion order, a camera offset applied when they
/// render, and a background cell painted under everything each frame.
/// Every tick runs the entities and then a collision pass over them.
pub struct Level {
    entities: EntityList,
    offset: (i32, i32),
    background: Cell,
}

impl Level {
    /// Create an empty level with the given background cell.
    pub fn new(background: Cell) -> Self {
        Self {
            entities: EntityList::default(),
            offset: (0, 0),
            background,
        }
    }

    /// Create an empty level with a solid background color.
    pub fn with_color(color: Color) -> Self {
        Self::new(Cell::background(color))
    }

    /// Add an entity. It ticks and draws after every entity added before it.
    pub fn add_entity(&mut self, entity: Box<dyn Drawable>) -> EntityId {
        self.entities.add(entity)
    }

    /// Remove an entity.
    ///
    /// Removal requested while the level is drawing takes effect when the
    /// pass ends, and returns `None`.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Drawable>> {
        self.entities.remove(id)
    }

    /// Check whether an entity is in this level.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(id)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check whether the level has no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entity ids in insertion order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.ids().collect()
    }

    /// Camera offset added to every cell rendered by the level's entities.
    pub const fn offset(&self) -> (i32, i32) {
        self.offset
    }

    /// Move the camera.
    pub fn set_offset(&mut self, x: i32, y: i32) {
        self.offset = (x, y);
    }

    /// Background cell.
    pub const fn background(&self) -> &Cell {
        &self.background
    }

    /// Replace the background cell.
    pub fn set_background(&mut self, background: Cell) {
        self.background = background;
    }

    /// Tick every entity in insertion order, then resolve collisions.
    pub fn tick(&mut self, event: &Event) {
        self.entities.tick(event);
        resolve_collisions(self.entities.slots_mut());
    }

    pub(crate) fn detach(&mut self) -> Vec<Slot> {
        self.entities.detach()
    }

    pub(crate) fn reattach(&mut self, slots: Vec<Slot>) {
        self.entities.reattach(slots);
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::new(Cell::TRANSPARENT)
    }
}

impl std::fmt::Debug for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Level")
            .field("entities", &self.len())
            .field("offset", &self.offset)
            .field("background", &self.background)
            .finish()
    }
}
