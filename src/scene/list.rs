//! Ordered entity storage shared by levels and the screen.

use super::entity::{Drawable, EntityId};
use crate::actor::Event;

/// One stored entity and its id.
pub(crate) struct Slot {
    pub(crate) id: EntityId,
    pub(crate) entity: Box<dyn Drawable>,
}

impl AsRef<dyn Drawable> for Slot {
    fn as_ref(&self) -> &(dyn Drawable + 'static) {
        &*self.entity
    }
}

impl AsMut<dyn Drawable> for Slot {
    fn as_mut(&mut self) -> &mut (dyn Drawable + 'static) {
        &mut *self.entity
    }
}

/// Entities in insertion order.
///
/// During a draw pass the slots are moved out ([`detach`](Self::detach))
/// so each entity can borrow the screen mutably. Entities added meanwhile
/// land behind the detached ones and removals wait until
/// [`reattach`](Self::reattach).
#[derive(Default)]
pub(crate) struct EntityList {
    slots: Vec<Slot>,
    detached: bool,
    pending_removals: Vec<EntityId>,
}

impl EntityList {
    pub(crate) fn add(&mut self, entity: Box<dyn Drawable>) -> EntityId {
        let id = EntityId::next();
        self.slots.push(Slot { id, entity });
        id
    }

    /// Remove an entity. While detached, the removal is deferred and
    /// `None` is returned.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Box<dyn Drawable>> {
        if self.detached {
            self.pending_removals.push(id);
            return None;
        }
        let index = self.slots.iter().position(|slot| slot.id == id)?;
        Some(self.slots.remove(index).entity)
    }

    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.slots.iter().any(|slot| slot.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    pub(crate) fn tick(&mut self, event: &Event) {
        for slot in &mut self.slots {
            slot.entity.tick(event);
        }
    }

    pub(crate) fn detach(&mut self) -> Vec<Slot> {
        self.detached = true;
        std::mem::take(&mut self.slots)
    }

    pub(crate) fn reattach(&mut self, mut slots: Vec<Slot>) {
        slots.append(&mut self.slots);
        self.slots = slots;
        self.detached = false;
        for id in std::mem::take(&mut self.pending_removals) {
            self.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Screen;

    struct Nop;

    impl Drawable for Nop {
        fn tick(&mut self, _event: &Event) {}
        fn draw(&mut self, _screen: &mut Screen) {}
    }

    #[test]
    fn test_add_remove_keeps_order() {
        let mut list = EntityList::default();
        let a = list.add(Box::new(Nop));
        let b = list.add(Box::new(Nop));
        let c = list.add(Box::new(Nop));

        assert!(list.remove(b).is_some());
        assert!(list.remove(b).is_none());
        assert_eq!(list.ids().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_detached_add_and_remove() {
        let mut list = EntityList::default();
        let a = list.add(Box::new(Nop));
        let b = list.add(Box::new(Nop));

        let slots = list.detach();
        let c = list.add(Box::new(Nop));
        assert!(list.remove(a).is_none());
        list.reattach(slots);

        assert_eq!(list.ids().collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(list.len(), 2);
    }
}
