//! Ground and wall sensors
//!
//! The player body carries three trigger colliders. Their contacts, as left
//! by last tick's contact update, decide grounded and wall-touching state and
//! produce stand/climb touch events for whatever the player is on.

use super::state::{ControlState, PlayerFlags};
use super::{PlayerController, PlayerIo};
use crate::cues::{AnimationCue, Cue, HapticCue, PlayEvent, SoundCue, TouchEvent};
use platform_engine::ecs::Entity;
use platform_engine::physics::{BodyHandle, PhysicsWorld};

/// Owners of whatever each player sensor overlaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerContacts {
    /// Under the ground sensor
    pub ground: Vec<Entity>,
    /// Under the right wall sensor
    pub right: Vec<Entity>,
    /// Under the left wall sensor
    pub left: Vec<Entity>,
}

impl TriggerContacts {
    /// Position of the ground sensor among the body's triggers
    pub const GROUND: usize = 0;
    /// Position of the right wall sensor among the body's triggers
    pub const RIGHT: usize = 1;
    /// Position of the left wall sensor among the body's triggers
    pub const LEFT: usize = 2;

    /// Read sensor contacts off the player body
    pub fn read(physics: &PhysicsWorld, player: BodyHandle) -> Self {
        let Some(body) = physics.body(player) else {
            return Self::default();
        };
        let owners = |nth: usize| -> Vec<Entity> {
            let mut owners: Vec<Entity> = Vec::new();
            let Some(trigger) = body.trigger_collider(nth) else {
                return owners;
            };
            for &contact in trigger.contacts() {
                if let Some(owner) = physics.owner_of(contact) {
                    if !owners.contains(&owner) {
                        owners.push(owner);
                    }
                }
            }
            owners
        };

        Self {
            ground: owners(Self::GROUND),
            right: owners(Self::RIGHT),
            left: owners(Self::LEFT),
        }
    }
}

/// Which wall sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WallSide {
    Left,
    Right,
}

impl WallSide {
    fn flag(self) -> PlayerFlags {
        match self {
            Self::Left => PlayerFlags::TOUCHING_LEFT_WALL,
            Self::Right => PlayerFlags::TOUCHING_RIGHT_WALL,
        }
    }

    /// Direction of the wall from the player
    fn dir(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Entities in `now` missing from `before`
fn entered(before: &[Entity], now: &[Entity]) -> Vec<Entity> {
    now.iter().filter(|e| !before.contains(e)).copied().collect()
}

impl PlayerController {
    pub(super) fn handle_triggers(&mut self, contacts: &TriggerContacts, io: &mut PlayerIo<'_>) {
        // Ground
        let before = std::mem::replace(&mut self.state.touching.ground, contacts.ground.clone());
        Self::touch(io, entered(&before, &contacts.ground).into_iter().map(TouchEvent::EnterStand));
        Self::touch(io, entered(&contacts.ground, &before).into_iter().map(TouchEvent::ExitStand));

        if !contacts.ground.is_empty() {
            self.hit_ground(io);
        } else if self.is(PlayerFlags::GROUNDED) {
            self.state.set(PlayerFlags::GROUNDED, false);
        }

        self.update_wall(WallSide::Right, &contacts.right, io);
        self.update_wall(WallSide::Left, &contacts.left, io);
    }

    fn update_wall(&mut self, side: WallSide, now: &[Entity], io: &mut PlayerIo<'_>) {
        let touching = match side {
            WallSide::Right => &mut self.state.touching.right,
            WallSide::Left => &mut self.state.touching.left,
        };
        let before = std::mem::replace(touching, now.to_vec());

        let climbing_this_side = self.state.control == ControlState::Climbing
            && self.is(PlayerFlags::CLIMBING_RIGHT_WALL) == (side == WallSide::Right);
        if climbing_this_side {
            Self::touch(io, entered(&before, now).into_iter().map(TouchEvent::EnterClimb));
            Self::touch(io, entered(now, &before).into_iter().map(TouchEvent::ExitClimb));
        }

        if !now.is_empty() {
            self.state.set(side.flag(), true);
        } else if self.is(side.flag()) {
            self.leave_wall(side, io);
        }
    }

    fn hit_ground(&mut self, io: &mut PlayerIo<'_>) {
        let was_grounded = self.is(PlayerFlags::GROUNDED);
        self.state.set(PlayerFlags::GROUNDED, true);
        self.state.timers.time_since_grounded = 0.0;

        if io.motion.velocity.y < 0.0 {
            self.state.set(PlayerFlags::HAS_JUMPED, false);
            io.motion.velocity.y = 0.0;
            io.motion.acceleration.y = 0.0;

            io.emit(Cue::Sound(SoundCue::Land));
            if !was_grounded {
                io.emit(Cue::Haptic(HapticCue::LandGround));
            }
            if self.is(PlayerFlags::HIT_STRAWBERRY) {
                self.state.set(PlayerFlags::HIT_STRAWBERRY, false);
                io.emit(Cue::Play(PlayEvent::StrawberriesCollected));
            }
            self.play_animation(io, AnimationCue::Landed, 1.0);
        }

        self.replenish();
    }

    fn leave_wall(&mut self, side: WallSide, io: &mut PlayerIo<'_>) {
        self.state.set(side.flag(), false);
        if self.state.control == ControlState::Climbing && !self.state.is_touching_wall() {
            self.fall_off_climb(side.dir(), io);
        }
    }
}
