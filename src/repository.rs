//! Storage seam for resource actors.

use crate::actor_framework::Entity;
use crate::error::ApiError;

/// Where [`Repository::locate`] found an entity. Valid until the collection
/// next changes, which within one actor means until the current request ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(usize);

/// Collection owned by exactly one resource actor.
///
/// The actor is the only caller, so implementations need no locking.
pub trait Repository<T: Entity>: Send + 'static {
    fn list(&self) -> Vec<T>;
    /// The single lookup by id. Later writes address the returned slot.
    fn locate(&self, id: u64) -> Option<(Slot, &T)>;
    fn insert(&mut self, item: T);
    /// Swaps the entity at `slot`, returning the previous one. `None` if the slot is stale.
    fn replace(&mut self, slot: Slot, item: T) -> Option<T>;
    fn remove(&mut self, slot: Slot) -> Option<T>;
    fn max_id(&self) -> Option<u64>;
    fn len(&self) -> usize;
}

/// Insertion-ordered in-memory list.
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    items: Vec<T>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn seeded(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn list(&self) -> Vec<T> {
        self.items.clone()
    }

    fn locate(&self, id: u64) -> Option<(Slot, &T)> {
        self.items
            .iter()
            .enumerate()
            .find(|(_, item)| item.id() == id)
            .map(|(index, item)| (Slot(index), item))
    }

    fn insert(&mut self, item: T) {
        self.items.push(item);
    }

    fn replace(&mut self, slot: Slot, item: T) -> Option<T> {
        self.items
            .get_mut(slot.0)
            .map(|current| std::mem::replace(current, item))
    }

    fn remove(&mut self, slot: Slot) -> Option<T> {
        (slot.0 < self.items.len()).then(|| self.items.remove(slot.0))
    }

    fn max_id(&self) -> Option<u64> {
        self.items.iter().map(Entity::id).max()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// `max + 1`, or `1` for an empty collection. Fails once the id space is used up.
pub fn next_id(resource: &'static str, max_id: Option<u64>) -> Result<u64, ApiError> {
    match max_id {
        Some(max) => max
            .checked_add(1)
            .ok_or(ApiError::IdsExhausted { resource }),
        None => Ok(1),
    }
}
