//! Deferred scene changes.
//!
//! Collision handlers and tick handlers do not get the [`Screen`], so they
//! request changes through a [`Commands`] handle instead. The queue is
//! drained once the current frame has been drawn, so a tick and its draw
//! always see the same level.
//!
//! [`Screen`]: super::Screen

use super::entity::Drawable;
use super::level::Level;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub(crate) enum Command {
    SetLevel(Box<Level>),
    AddEntity(Box<dyn Drawable>),
    AddLevelEntity(Box<dyn Drawable>),
    SetOffset(i32, i32),
}

/// Cloneable handle for queuing scene changes.
///
/// Get one from [`Screen::commands`](super::Screen::commands).
#[derive(Clone, Default)]
pub struct Commands {
    queue: Rc<RefCell<VecDeque<Command>>>,
}

impl Commands {
    /// Replace the active level after this frame.
    pub fn set_level(&self, level: Level) {
        self.push(Command::SetLevel(Box::new(level)));
    }

    /// Add a screen-level entity after this frame.
    pub fn add_entity(&self, entity: Box<dyn Drawable>) {
        self.push(Command::AddEntity(entity));
    }

    /// Add an entity to the active level after this frame.
    ///
    /// Applied after any level swap queued before it.
    pub fn add_level_entity(&self, entity: Box<dyn Drawable>) {
        self.push(Command::AddLevelEntity(entity));
    }

    /// Move the active level's camera after this frame.
    pub fn set_offset(&self, x: i32, y: i32) {
        self.push(Command::SetOffset(x, y));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Check whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    fn push(&self, command: Command) {
        self.queue.borrow_mut().push_back(command);
    }

    pub(crate) fn pop(&self) -> Option<Command> {
        self.queue.borrow_mut().pop_front()
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands").field("queued", &self.len()).finish()
    }
}
