//! Player controller state

use super::facing::Facing;
use crate::cues::AnimationCue;
use crate::input::ButtonLatch;
use bitflags::bitflags;
use platform_engine::ecs::Entity;
use platform_engine::foundation::math::Vec2;

/// Which movement mode owns the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    /// Running, jumping, falling and wall sliding
    #[default]
    Normal,
    /// In a dash
    Dashing,
    /// Holding on to a wall
    Climbing,
}

bitflags! {
    /// Sub-state flags, valid alongside any [`ControlState`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PlayerFlags: u32 {
        /// Ground sensor has contacts
        const GROUNDED = 1 << 0;
        /// Left wall sensor has contacts
        const TOUCHING_LEFT_WALL = 1 << 1;
        /// Right wall sensor has contacts
        const TOUCHING_RIGHT_WALL = 1 << 2;
        /// Pushing into a wall while falling
        const WALL_SLIDING = 1 << 3;
        /// Rising from a jump
        const JUMPING = 1 << 4;
        /// Run control is locked after a wall jump
        const WALL_JUMPING = 1 << 5;
        /// Rising from a spring
        const SPRING_JUMPING = 1 << 6;
        /// Jumped since last landing, so no buffered jump
        const HAS_JUMPED = 1 << 7;
        /// Jump pressed in the air, waiting for ground or wall
        const JUMP_QUEUED = 1 << 8;
        /// Dash is shedding speed
        const DASH_DECELERATING = 1 << 9;
        /// Climbing the wall on the right
        const CLIMBING_RIGHT_WALL = 1 << 10;
        /// Vaulting over the top of a climbed wall
        const CLIMB_VAULTING = 1 << 11;
        /// Moving between scenes, input ignored
        const EXITING_SCENE = 1 << 12;
        /// A spring launch is due this tick
        const HIT_SPRING = 1 << 13;
        /// Carrying strawberries not yet banked
        const HIT_STRAWBERRY = 1 << 14;
        /// Death is due at the start of next tick
        const KILL_PENDING = 1 << 15;
    }
}

/// Countdown and stopwatch values, in scaled seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timers {
    /// Time since the ground sensor last had contacts
    pub time_since_grounded: f32,
    /// Age of the queued jump
    pub jump_queue_time: f32,
    /// Time since the last wall jump
    pub wall_jump_time: f32,
    /// Time since the dash started
    pub dash_time: f32,
    /// Time since the vault started
    pub climb_vault_time: f32,
}

/// Entities under each of the player's sensors as of the last tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Touching {
    /// Under the ground sensor
    pub ground: Vec<Entity>,
    /// Under the right wall sensor
    pub right: Vec<Entity>,
    /// Under the left wall sensor
    pub left: Vec<Entity>,
}

impl Touching {
    /// Entities on the wall being climbed
    pub fn climbed(&self, right_wall: bool) -> &[Entity] {
        if right_wall {
            &self.right
        } else {
            &self.left
        }
    }
}

/// Full live state of the player controller
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Current movement mode
    pub control: ControlState,
    /// Sub-state flags
    pub flags: PlayerFlags,
    /// Timers
    pub timers: Timers,
    /// Dashes left before landing
    pub dash_count: u32,
    /// Climb stamina left
    pub climb_stamina: f32,
    /// Normalized direction of the current dash
    pub dash_direction: Vec2,
    /// Horizontal direction of the current vault
    pub climb_vault_dir: f32,
    /// Last non-zero horizontal input
    pub last_x_axis: f32,
    /// Last non-zero vertical input
    pub last_y_axis: f32,
    /// Buttons held last tick
    pub buttons: ButtonLatch,
    /// Sensor contacts as of last tick
    pub touching: Touching,
    /// Which way the player faces
    pub facing: Facing,
    /// Last animation requested, with its speed
    pub animation: Option<(AnimationCue, f32)>,
}

impl PlayerState {
    /// Fresh state with full dashes and stamina
    pub fn new(dash_count: u32, climb_stamina: f32) -> Self {
        Self {
            control: ControlState::Normal,
            flags: PlayerFlags::empty(),
            timers: Timers::default(),
            dash_count,
            climb_stamina,
            dash_direction: Vec2::zeros(),
            climb_vault_dir: 0.0,
            last_x_axis: 1.0,
            last_y_axis: 0.0,
            buttons: ButtonLatch::default(),
            touching: Touching::default(),
            facing: Facing::new(),
            animation: None,
        }
    }

    /// Is the flag set?
    pub fn is(&self, flag: PlayerFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Set or clear a flag
    pub fn set(&mut self, flag: PlayerFlags, value: bool) {
        self.flags.set(flag, value);
    }

    /// Touching a wall on either side?
    pub fn is_touching_wall(&self) -> bool {
        self.flags
            .intersects(PlayerFlags::TOUCHING_LEFT_WALL | PlayerFlags::TOUCHING_RIGHT_WALL)
    }

    /// Horizontal direction away from the touched wall, preferring the left wall
    pub fn wall_jump_dir(&self) -> f32 {
        if self.is(PlayerFlags::TOUCHING_LEFT_WALL) {
            1.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_normal_and_flagless() {
        let state = PlayerState::new(1, 110.0);
        assert_eq!(state.control, ControlState::Normal);
        assert!(state.flags.is_empty());
        assert_eq!(state.dash_count, 1);
        assert!(!state.is_touching_wall());
    }

    #[test]
    fn test_wall_jump_pushes_away_from_wall() {
        let mut state = PlayerState::new(1, 110.0);
        state.set(PlayerFlags::TOUCHING_RIGHT_WALL, true);
        assert_eq!(state.wall_jump_dir(), -1.0);
        state.set(PlayerFlags::TOUCHING_LEFT_WALL, true);
        assert_eq!(state.wall_jump_dir(), 1.0);
    }
}
