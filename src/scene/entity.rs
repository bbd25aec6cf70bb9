//! Entity capability model.
//!
//! There is no entity base type. A scene object opts into capabilities by
//! implementing traits:
//!
//! - [`Drawable`]: receives events in `tick` and paints itself in `draw`
//! - [`Physical`]: exposes a bounding box for geometric queries
//! - [`DynamicPhysical`]: a [`Physical`] that handles its own collisions
//!
//! Entities are stored as `Box<dyn Drawable>`, so the physical capabilities
//! are discovered through [`Drawable::as_physical`] and
//! [`Drawable::as_dynamic_physical`]. An entity that implements
//! `DynamicPhysical` should override both.

use super::Screen;
use crate::actor::Event;
use crate::layout::Rect;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

/// Something that takes part in the frame loop.
pub trait Drawable {
    /// React to one event (movement, state changes...).
    fn tick(&mut self, event: &Event);

    /// Paint into the screen buffer.
    ///
    /// May also move the camera through [`Screen::set_offset`].
    fn draw(&mut self, screen: &mut Screen);

    /// This entity's [`Physical`] view, if it has one.
    fn as_physical(&self) -> Option<&dyn Physical> {
        None
    }

    /// This entity's [`DynamicPhysical`] view, if it has one.
    fn as_dynamic_physical(&mut self) -> Option<&mut dyn DynamicPhysical> {
        None
    }
}

/// Something with a position and a size that others can collide with.
pub trait Physical {
    /// Top-left corner in level coordinates.
    fn position(&self) -> (i32, i32);

    /// Width and height.
    fn size(&self) -> (i32, i32);

    /// Bounding box built from `position` and `size`.
    fn bounds(&self) -> Rect {
        Rect::from_parts(self.position(), self.size())
    }

    /// Concrete type access, for collision handlers that need to know
    /// what they hit.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// A [`Physical`] that decides what colliding means for itself.
pub trait DynamicPhysical: Physical {
    /// Called with the other party's view when the bounding boxes overlap.
    fn collide(&mut self, other: &dyn Physical);
}

/// Check whether two physical entities overlap.
pub fn overlaps(a: &dyn Physical, b: &dyn Physical) -> bool {
    a.bounds().intersects(&b.bounds())
}

/// Naive pairwise collision pass.
///
/// For every entity with a [`DynamicPhysical`] view and every *other* entity
/// with a [`Physical`] view whose boxes overlap, calls `collide` on the
/// first with the second. Geometry is read live, so a collision handler
/// that moves its entity affects the remaining pairs. Returns the number
/// of `collide` calls made.
pub fn resolve_collisions<E>(entities: &mut [E]) -> usize
where
    E: AsRef<dyn Drawable> + AsMut<dyn Drawable>,
{
    let mut hits = 0;
    for i in 0..entities.len() {
        if entities[i].as_mut().as_dynamic_physical().is_none() {
            continue;
        }
        for j in 0..entities.len() {
            if i == j {
                continue;
            }
            let (this, other) = pair_mut(entities, i, j);
            let Some(other) = other.as_ref().as_physical() else {
                continue;
            };
            let Some(this) = this.as_mut().as_dynamic_physical() else {
                continue;
            };
            if this.bounds().intersects(&other.bounds()) {
                this.collide(other);
                hits += 1;
            }
        }
    }
    hits
}

/// Borrow element `i` mutably and element `j` shared. `i != j`.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &left[j])
    }
}

/// Identifies an entity inside a [`Level`](super::Level) or the screen's
/// entity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Wall(Rect);

    impl Physical for Wall {
        fn position(&self) -> (i32, i32) {
            (self.0.x, self.0.y)
        }
        fn size(&self) -> (i32, i32) {
            (self.0.width, self.0.height)
        }
        fn as_any(&self) -> Option<&dyn Any> {
            Some(self)
        }
    }

    impl Drawable for Wall {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, _screen: &mut Screen) {}
        fn as_physical(&self) -> Option<&dyn Physical> {
            Some(self)
        }
    }

    struct Mover {
        at: (i32, i32),
        hits: Rc<RefCell<Vec<(i32, i32)>>>,
    }

    impl Physical for Mover {
        fn position(&self) -> (i32, i32) {
            self.at
        }
        fn size(&self) -> (i32, i32) {
            (1, 1)
        }
    }

    impl DynamicPhysical for Mover {
        fn collide(&mut self, other: &dyn Physical) {
            self.hits.borrow_mut().push(other.position());
        }
    }

    impl Drawable for Mover {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, _screen: &mut Screen) {}
        fn as_physical(&self) -> Option<&dyn Physical> {
            Some(self)
        }
        fn as_dynamic_physical(&mut self) -> Option<&mut dyn DynamicPhysical> {
            Some(self)
        }
    }

    struct Ghost;

    impl Drawable for Ghost {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, _screen: &mut Screen) {}
    }

    #[test]
    fn test_overlaps() {
        let a = Wall(Rect::new(0, 0, 2, 2));
        let b = Wall(Rect::new(1, 1, 2, 2));
        let c = Wall(Rect::new(5, 5, 1, 1));
        let d = Wall(Rect::new(0, 0, 1, 1));
        assert!(overlaps(&a, &b));
        assert!(!overlaps(&d, &c));
    }

    #[test]
    fn test_resolve_collisions_calls_dynamic_side_only() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut entities: Vec<Box<dyn Drawable>> = vec![
            Box::new(Wall(Rect::new(3, 3, 1, 1))),
            Box::new(Mover { at: (3, 3), hits: hits.clone() }),
            Box::new(Wall(Rect::new(9, 9, 1, 1))),
            Box::new(Ghost),
        ];

        let calls = resolve_collisions(&mut entities);

        assert_eq!(calls, 1);
        assert_eq!(*hits.borrow(), vec![(3, 3)]);
    }

    #[test]
    fn test_resolve_collisions_between_two_dynamic() {
        let a_hits = Rc::new(RefCell::new(Vec::new()));
        let b_hits = Rc::new(RefCell::new(Vec::new()));
        let mut entities: Vec<Box<dyn Drawable>> = vec![
            Box::new(Mover { at: (1, 1), hits: a_hits.clone() }),
            Box::new(Mover { at: (1, 1), hits: b_hits.clone() }),
        ];

        assert_eq!(resolve_collisions(&mut entities), 2);
        assert_eq!(a_hits.borrow().len(), 1);
        assert_eq!(b_hits.borrow().len(), 1);
    }

    #[test]
    fn test_as_any_downcast() {
        let wall = Wall(Rect::new(0, 0, 1, 1));
        let physical: &dyn Physical = &wall;
        assert!(physical.as_any().and_then(|a| a.downcast_ref::<Wall>()).is_some());
    }

    #[test]
    fn test_entity_ids_unique() {
        let a = EntityId::next();
        let b = EntityId::next();
        assert_ne!(a, b);
    }
}
