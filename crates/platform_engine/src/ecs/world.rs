//! Entity registry
//!
//! Hands out entity ids and records which ones are alive. Destruction can be
//! immediate or queued until the end of the tick; whoever owns per-entity
//! state (bodies, game objects) drains the queue and tears that state down in
//! the same step.

use super::Entity;
use std::collections::BTreeSet;

/// Registry of live entities
pub struct World {
    next_entity_id: u32,
    alive: BTreeSet<Entity>,
    pending_destroy: Vec<Entity>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            alive: BTreeSet::new(),
            pending_destroy: Vec::new(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.alive.insert(entity);
        entity
    }

    /// Is the entity still alive?
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    /// Remove an entity right away. Returns false if it was already gone.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.pending_destroy.retain(|&e| e != entity);
        self.alive.remove(&entity)
    }

    /// Queue an entity for removal at the end of the tick
    pub fn queue_destroy(&mut self, entity: Entity) {
        if self.is_alive(entity) && !self.pending_destroy.contains(&entity) {
            self.pending_destroy.push(entity);
        }
    }

    /// Remove every queued entity and return them so their state can be torn down
    pub fn flush_destroyed(&mut self) -> Vec<Entity> {
        let pending = std::mem::take(&mut self.pending_destroy);
        for entity in &pending {
            self.alive.remove(entity);
        }
        pending
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        assert_ne!(a, b);
        assert!(world.is_alive(a) && world.is_alive(b));
    }

    #[test]
    fn test_immediate_destroy() {
        let mut world = World::new();
        let a = world.create_entity();
        assert!(world.destroy_entity(a));
        assert!(!world.is_alive(a));
        assert!(!world.destroy_entity(a));
    }

    #[test]
    fn test_deferred_destroy_waits_for_flush() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();

        world.queue_destroy(a);
        world.queue_destroy(a);
        assert!(world.is_alive(a));

        let flushed = world.flush_destroyed();
        assert_eq!(flushed, vec![a]);
        assert!(!world.is_alive(a));
        assert!(world.is_alive(b));
        assert!(world.flush_destroyed().is_empty());
    }
}
