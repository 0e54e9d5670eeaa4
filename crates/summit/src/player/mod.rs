//! Player controller
//!
//! A state machine over [`ControlState`] plus [`PlayerFlags`] that turns input
//! and last tick's sensor contacts into the player's acceleration and
//! velocity. It never touches the physics world directly: the caller hands
//! it the player's [`Motion`] and applies anything body-level (collision,
//! position) itself when the controller reports a death.
//!
//! Each handler lives in its own file as a separate `impl` block:
//! - `triggers`: ground and wall sensors
//! - `dash`: dashes and dash slow motion
//! - `climb`: climbing, wall slides and vaults
//! - `run`: horizontal movement and turning
//! - `jump`: gravity, jumps, wall jumps and spring jumps

mod climb;
mod dash;
pub mod facing;
mod jump;
mod run;
pub mod state;
pub mod triggers;

#[cfg(test)]
pub(crate) mod harness;

pub use facing::{Facing, Flip};
pub use state::{ControlState, PlayerFlags, PlayerState, Timers, Touching};
pub use triggers::TriggerContacts;

use crate::config::PlayerTunables;
use crate::cues::{AnimationCue, CameraShake, Cue, HapticCue, PlayEvent, SoundCue, TouchEvent};
use crate::input::InputFrame;
use platform_engine::events::EventQueue;
use platform_engine::foundation::math::Vec2;
use platform_engine::foundation::time::SimulationClock;
use platform_engine::physics::Motion;

/// What the controller reads each tick
#[derive(Debug, Clone, Copy)]
pub struct PlayerFrame<'a> {
    /// Input for this tick
    pub input: InputFrame,
    /// Scaled tick length
    pub delta_time: f32,
    /// Whether the player is inside the level
    pub in_bounds: bool,
    /// Entities under each sensor
    pub triggers: &'a TriggerContacts,
}

/// What the controller writes each tick
pub struct PlayerIo<'a> {
    /// The player body's motion
    pub motion: &'a mut Motion,
    /// Clock whose time scale dashes change
    pub clock: &'a mut SimulationClock,
    /// Outgoing cues
    pub cues: &'a mut EventQueue<Cue>,
}

impl PlayerIo<'_> {
    fn velocity(&self) -> Vec2 {
        self.motion.velocity
    }

    fn emit(&mut self, cue: Cue) {
        self.cues.send(cue);
    }
}

/// Result of a controller tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerOutcome {
    /// Still in play
    Alive,
    /// Died this tick; the body should stop colliding and moving
    Died,
}

/// The player's movement state machine
#[derive(Debug, Clone)]
pub struct PlayerController {
    tunables: PlayerTunables,
    state: PlayerState,
}

impl PlayerController {
    /// Create a controller with full dashes and stamina
    pub fn new(tunables: PlayerTunables) -> Self {
        let state = PlayerState::new(tunables.max_dash_count, tunables.climb_max_stamina);
        Self { tunables, state }
    }

    /// Current tunables
    pub fn tunables(&self) -> &PlayerTunables {
        &self.tunables
    }

    /// Swap tunables without touching live state
    pub fn set_tunables(&mut self, tunables: PlayerTunables) {
        self.tunables = tunables;
    }

    /// Live state
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    /// Current movement mode
    pub fn control(&self) -> ControlState {
        self.state.control
    }

    /// Is the flag set?
    pub fn is(&self, flag: PlayerFlags) -> bool {
        self.state.is(flag)
    }

    /// Run one tick
    pub fn update(&mut self, frame: &PlayerFrame<'_>, io: &mut PlayerIo<'_>) -> PlayerOutcome {
        if self.is(PlayerFlags::KILL_PENDING) {
            self.die(io);
            return PlayerOutcome::Died;
        }
        if self.is(PlayerFlags::EXITING_SCENE) {
            return PlayerOutcome::Alive;
        }
        if !frame.in_bounds {
            log::debug!("Player left the level");
            self.die(io);
            return PlayerOutcome::Died;
        }

        let input = frame.input;
        self.handle_triggers(frame.triggers, io);
        self.handle_dash_input(&input, frame.delta_time, io);
        self.handle_climb_input(&input, frame.delta_time, io);
        self.handle_movement_input(&input, frame.delta_time, io);
        self.handle_jump_input(&input, frame.delta_time, io);

        if input.x_axis != 0.0 {
            self.state.last_x_axis = input.x_axis;
        }
        if input.y_axis != 0.0 {
            self.state.last_y_axis = input.y_axis;
        }
        self.state.buttons.remember(&input);

        PlayerOutcome::Alive
    }

    /// A spring was touched: launch on the next tick
    pub fn hit_spring(&mut self, cues: &mut EventQueue<Cue>) {
        self.state.set(PlayerFlags::HIT_SPRING, true);
        self.replenish();
        cues.send(Cue::Haptic(HapticCue::SpringBounce));
    }

    /// A strawberry was picked up; it is banked on the next landing
    pub fn hit_strawberry(&mut self) {
        self.state.set(PlayerFlags::HIT_STRAWBERRY, true);
    }

    /// Die at the start of the next tick
    pub fn kill(&mut self) {
        self.state.set(PlayerFlags::KILL_PENDING, true);
    }

    /// Are dashes or stamina below their maximum?
    pub fn can_replenish(&self) -> bool {
        self.state.dash_count < self.tunables.max_dash_count
            || self.state.climb_stamina < self.tunables.climb_max_stamina
    }

    /// Refill dashes and stamina
    pub fn replenish(&mut self) {
        self.state.dash_count = self.tunables.max_dash_count;
        self.state.climb_stamina = self.tunables.climb_max_stamina;
    }

    /// Start moving into another scene
    ///
    /// Non-zero components of `launch_velocity` replace the current velocity;
    /// input is ignored until [`finish_scene_exit`](Self::finish_scene_exit).
    pub fn begin_scene_exit(&mut self, launch_velocity: Vec2, motion: &mut Motion, clock: &mut SimulationClock) {
        if launch_velocity.x != 0.0 {
            motion.velocity.x = launch_velocity.x;
        }
        if launch_velocity.y != 0.0 {
            motion.velocity.y = launch_velocity.y;
        }
        motion.acceleration = Vec2::zeros();

        self.end_dash(clock);
        self.replenish();
        self.state.set(PlayerFlags::EXITING_SCENE, true);
    }

    /// The scene transition is over
    pub fn finish_scene_exit(&mut self) {
        self.state.set(PlayerFlags::EXITING_SCENE, false);
    }

    /// Put the controller back to its spawn state
    pub fn respawn(&mut self) {
        let facing = self.state.facing;
        self.state = PlayerState::new(self.tunables.max_dash_count, self.tunables.climb_max_stamina);
        self.state.facing = facing;
    }

    fn die(&mut self, io: &mut PlayerIo<'_>) {
        let shake_direction = io.velocity();

        io.emit(Cue::Sound(SoundCue::Die));
        io.motion.stop();

        self.state.set(PlayerFlags::KILL_PENDING, false);
        self.state.set(PlayerFlags::HIT_STRAWBERRY, false);
        self.state.set(PlayerFlags::HIT_SPRING, false);
        if self.state.control == ControlState::Climbing {
            self.stop_climb(io);
        }
        self.end_dash(io.clock);
        self.replenish();
        self.state.touching = Touching::default();

        io.emit(Cue::Play(PlayEvent::PlayerDestroyed));
        io.emit(Cue::Haptic(HapticCue::PlayerDeath));
        io.emit(Cue::CameraShake(CameraShake::new(
            shake_direction,
            self.tunables.death_cam_shake_dist,
            self.tunables.death_cam_shake_time,
        )));
        log::info!("Player died");
    }

    /// Request an animation unless it is already playing at that speed
    fn play_animation(&mut self, io: &mut PlayerIo<'_>, cue: AnimationCue, speed: f32) {
        if self.state.animation != Some((cue, speed)) {
            self.state.animation = Some((cue, speed));
            io.emit(Cue::Animation { cue, speed });
        }
    }

    fn shake_camera(io: &mut PlayerIo<'_>, direction: Vec2, distance: f32, duration: f32) {
        io.emit(Cue::CameraShake(CameraShake::new(direction, distance, duration)));
    }

    fn touch(io: &mut PlayerIo<'_>, events: impl IntoIterator<Item = TouchEvent>) {
        for event in events {
            io.emit(Cue::Touch(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::harness::Harness;
    use super::*;

    #[test]
    fn test_kill_applies_on_next_tick() {
        let mut h = Harness::new();
        h.motion.velocity = Vec2::new(3.0, 0.0);
        h.controller.kill();

        assert_eq!(h.step(InputFrame::idle(), &TriggerContacts::default()), PlayerOutcome::Died);
        assert_eq!(h.motion, Motion::new());
        assert!(!h.controller.is(PlayerFlags::KILL_PENDING));
        assert!(h.cues().contains(&Cue::Play(PlayEvent::PlayerDestroyed)));
    }

    #[test]
    fn test_out_of_bounds_dies() {
        let mut h = Harness::new();
        h.in_bounds = false;
        assert_eq!(h.step(InputFrame::idle(), &TriggerContacts::default()), PlayerOutcome::Died);
    }

    #[test]
    fn test_scene_exit_ignores_input() {
        let mut h = Harness::new();
        h.controller
            .begin_scene_exit(Vec2::new(6.0, 0.0), &mut h.motion, &mut h.clock);
        h.step(InputFrame::idle().with_axes(-1.0, 0.0).with_jump(), &TriggerContacts::default());
        assert_eq!(h.motion.velocity, Vec2::new(6.0, 0.0));
        assert_eq!(h.motion.acceleration, Vec2::zeros());

        h.controller.finish_scene_exit();
        h.step(InputFrame::idle().with_axes(-1.0, 0.0), &TriggerContacts::default());
        assert!(h.motion.acceleration.x < 0.0);
    }

    #[test]
    fn test_animation_requests_are_deduplicated() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        h.step(InputFrame::idle(), &ground);
        let idles = h
            .cues()
            .iter()
            .filter(|c| matches!(c, Cue::Animation { cue: AnimationCue::Idle, .. }))
            .count();
        assert_eq!(idles, 1);
    }

    #[test]
    fn test_respawn_resets_state() {
        let mut h = Harness::new();
        h.controller.kill();
        h.step(InputFrame::idle(), &TriggerContacts::default());
        h.controller.respawn();
        let state = h.controller.state();
        assert_eq!(state.control, ControlState::Normal);
        assert!(state.flags.is_empty());
        assert_eq!(state.dash_count, h.controller.tunables().max_dash_count);
    }

    #[test]
    fn test_reloading_tunables_keeps_state() {
        let mut h = Harness::new();
        h.step(InputFrame::idle().with_dash().with_axes(1.0, 0.0), &TriggerContacts::default());
        assert_eq!(h.controller.control(), ControlState::Dashing);

        let mut tunables = h.controller.tunables().clone();
        tunables.max_run_speed = 12.0;
        h.controller.set_tunables(tunables);
        assert_eq!(h.controller.control(), ControlState::Dashing);
        assert_eq!(h.controller.state().dash_count, 0);
        assert_eq!(h.controller.tunables().max_run_speed, 12.0);
    }
}
