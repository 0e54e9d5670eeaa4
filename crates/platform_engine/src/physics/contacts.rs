//! Trigger contact tracking
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.10:
//! "Collision event callbacks"
//!
//! Every tick, each collidable body carrying triggers is compared with every
//! collidable body carrying solids. Body-level contacts follow the broad
//! phase; collider-level contacts follow static overlap of trigger against
//! solid. Every change is recorded on both sides and reported as a
//! [`ContactEvent`].

use super::collider::ColliderHandle;
use super::world::{BodyHandle, PhysicsWorld};
use crate::ecs::Entity;

/// A trigger collider and the solid collider it overlaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactPair {
    /// The trigger side
    pub trigger: ColliderHandle,
    /// Owner of the trigger side
    pub trigger_owner: Entity,
    /// The solid side
    pub solid: ColliderHandle,
    /// Owner of the solid side
    pub solid_owner: Entity,
}

impl ContactPair {
    /// Create a pair
    pub fn new(trigger: ColliderHandle, trigger_owner: Entity, solid: ColliderHandle, solid_owner: Entity) -> Self {
        Self {
            trigger,
            trigger_owner,
            solid,
            solid_owner,
        }
    }

    /// Does either side belong to `owner`?
    pub fn involves(&self, owner: Entity) -> bool {
        self.trigger_owner == owner || self.solid_owner == owner
    }

    /// The owner on the other side from `owner`
    pub fn peer_of(&self, owner: Entity) -> Option<Entity> {
        if self.trigger_owner == owner {
            Some(self.solid_owner)
        } else if self.solid_owner == owner {
            Some(self.trigger_owner)
        } else {
            None
        }
    }

    /// The collider on `owner`'s side
    pub fn collider_of(&self, owner: Entity) -> Option<ColliderHandle> {
        if self.trigger_owner == owner {
            Some(self.trigger)
        } else if self.solid_owner == owner {
            Some(self.solid)
        } else {
            None
        }
    }
}

/// A contact starting or ending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    /// The colliders started overlapping
    Entered(ContactPair),
    /// The colliders stopped overlapping, or one of them went away
    Exited(ContactPair),
}

impl ContactEvent {
    /// The pair this event is about
    pub fn pair(&self) -> &ContactPair {
        match self {
            Self::Entered(pair) | Self::Exited(pair) => pair,
        }
    }
}

/// Keeps trigger contacts up to date
#[derive(Debug, Default)]
pub struct ContactTracker {
    trigger_bodies: Vec<BodyHandle>,
    solid_bodies: Vec<BodyHandle>,
    pending: Vec<(ColliderHandle, ColliderHandle, bool)>,
}

impl ContactTracker {
    /// Create a tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh every trigger contact in `world`
    pub fn update(&mut self, world: &mut PhysicsWorld) {
        self.trigger_bodies.clear();
        self.solid_bodies.clear();
        for (handle, body) in world.iter() {
            if !body.is_collidable() {
                continue;
            }
            if body.has_triggers() {
                self.trigger_bodies.push(handle);
            }
            if body.has_solids() {
                self.solid_bodies.push(handle);
            }
        }

        let before = world.events().len();
        for i in 0..self.trigger_bodies.len() {
            for j in 0..self.solid_bodies.len() {
                let (trigger_body, solid_body) = (self.trigger_bodies[i], self.solid_bodies[j]);
                self.update_pair(world, trigger_body, solid_body);
            }
        }

        let changed = world.events().len() - before;
        if changed > 0 {
            log::debug!("Contact tracker recorded {} contact changes", changed);
        }
    }

    fn update_pair(&mut self, world: &mut PhysicsWorld, trigger_body: BodyHandle, solid_body: BodyHandle) {
        if trigger_body == solid_body {
            return;
        }
        let (Some(a), Some(b)) = (world.body(trigger_body), world.body(solid_body)) else {
            return;
        };
        if a.owner() == b.owner() {
            return;
        }

        let contacting = a.is_contacting(solid_body);
        if !a.in_collision_range(b) {
            if contacting {
                world.exit_contacts(trigger_body, solid_body);
            }
            return;
        }

        self.pending.clear();
        for &ti in a.trigger_indices() {
            let trigger = &a.colliders()[ti];
            let trigger_handle = ColliderHandle::new(trigger_body, ti);
            for &si in b.solid_indices() {
                let solid = &b.colliders()[si];
                let solid_handle = ColliderHandle::new(solid_body, si);
                let overlapping = trigger.collision_check(solid).is_collision();
                let recorded = trigger.is_contacting(solid_handle);
                if overlapping != recorded {
                    self.pending.push((trigger_handle, solid_handle, overlapping));
                }
            }
        }

        if !contacting {
            world.link_bodies(trigger_body, solid_body);
        }
        for &(trigger, solid, entered) in &self.pending {
            if entered {
                world.link_colliders(trigger, solid);
            } else {
                world.unlink_colliders(trigger, solid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::foundation::math::Vec2;
    use crate::physics::Body;

    struct Scene {
        world: World,
        physics: PhysicsWorld,
        tracker: ContactTracker,
        sensor: BodyHandle,
        wall: BodyHandle,
    }

    fn scene(wall_x: f32) -> Scene {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();

        let mut sensor = Body::new(world.create_entity(), Vec2::zeros()).moveable();
        sensor.add_box_collider(true, false, Vec2::zeros(), Vec2::new(1.0, 1.0));
        let sensor = physics.spawn_body(sensor);

        let mut wall = Body::new(world.create_entity(), Vec2::new(wall_x, 0.0));
        wall.add_box_collider(false, false, Vec2::zeros(), Vec2::new(1.0, 1.0));
        let wall = physics.spawn_body(wall);

        Scene {
            world,
            physics,
            tracker: ContactTracker::new(),
            sensor,
            wall,
        }
    }

    #[test]
    fn test_overlap_enters_contact_on_both_sides() {
        let mut s = scene(0.75);
        s.tracker.update(&mut s.physics);

        let t = ColliderHandle::new(s.sensor, 0);
        let w = ColliderHandle::new(s.wall, 0);
        assert!(s.physics.collider(t).unwrap().is_contacting(w));
        assert!(s.physics.collider(w).unwrap().is_contacting(t));
        assert!(s.physics.body(s.sensor).unwrap().is_contacting(s.wall));
        assert!(s.physics.body(s.wall).unwrap().is_contacting(s.sensor));

        let events = s.physics.drain_events();
        assert_eq!(events.len(), 1);
        let ContactEvent::Entered(pair) = events[0] else {
            panic!("expected an enter event");
        };
        assert_eq!(pair.trigger, t);
        assert_eq!(pair.solid, w);
        assert_eq!(pair.peer_of(pair.trigger_owner), Some(pair.solid_owner));
    }

    #[test]
    fn test_repeated_updates_are_stable() {
        let mut s = scene(0.75);
        s.tracker.update(&mut s.physics);
        s.physics.drain_events();
        s.tracker.update(&mut s.physics);
        assert!(s.physics.drain_events().is_empty());
    }

    #[test]
    fn test_separation_exits_contact() {
        let mut s = scene(0.75);
        s.tracker.update(&mut s.physics);
        s.physics.drain_events();

        // Still within broad phase, no longer overlapping
        s.physics.set_position(s.sensor, Vec2::new(-0.3, 0.0));
        s.tracker.update(&mut s.physics);
        let events = s.physics.drain_events();
        assert!(matches!(events.as_slice(), [ContactEvent::Exited(_)]));
        assert!(s.physics.body(s.sensor).unwrap().is_contacting(s.wall));
        assert!(s.physics.contacts_are_consistent());

        // Out of broad phase: body contact goes too
        s.physics.set_position(s.sensor, Vec2::new(-5.0, 0.0));
        s.tracker.update(&mut s.physics);
        assert!(s.physics.body(s.sensor).unwrap().contacts().is_empty());
        assert!(s.physics.body(s.wall).unwrap().contacts().is_empty());
    }

    #[test]
    fn test_leaving_range_drops_collider_contacts() {
        let mut s = scene(0.75);
        s.tracker.update(&mut s.physics);
        s.physics.drain_events();

        s.physics.set_position(s.sensor, Vec2::new(-10.0, 0.0));
        s.tracker.update(&mut s.physics);
        let events = s.physics.drain_events();
        assert!(matches!(events.as_slice(), [ContactEvent::Exited(_)]));
        assert!(s.physics.collider(ColliderHandle::new(s.wall, 0)).unwrap().contacts().is_empty());
    }

    #[test]
    fn test_same_owner_is_ignored() {
        let mut s = scene(0.75);
        let owner = s.physics.body(s.sensor).unwrap().owner();
        let mut own_solid = Body::new(owner, Vec2::zeros());
        own_solid.add_box_collider(false, false, Vec2::zeros(), Vec2::new(1.0, 1.0));
        let own_solid = s.physics.spawn_body(own_solid);

        s.tracker.update(&mut s.physics);
        assert!(!s.physics.body(s.sensor).unwrap().is_contacting(own_solid));
        assert!(s.world.is_alive(owner));
    }

    #[test]
    fn test_destroyed_body_is_never_touched_again() {
        let mut s = scene(0.75);
        s.tracker.update(&mut s.physics);
        s.physics.destroy_body(s.wall);
        s.tracker.update(&mut s.physics);

        let sensor = s.physics.body(s.sensor).unwrap();
        assert!(sensor.contacts().is_empty());
        assert!(sensor.colliders()[0].contacts().is_empty());
        assert!(s.physics.contacts_are_consistent());
    }
}
