//! Gravity and jumping
//!
//! A jump press is honoured, in order of preference, as a jump from the
//! ground, a buffered jump shortly after walking off a ledge, a wall jump, or
//! else queued so it fires on landing or touching a wall shortly after.

use super::state::{ControlState, PlayerFlags};
use super::{PlayerController, PlayerIo};
use crate::cues::{AnimationCue, Cue, HapticCue, SoundCue};
use crate::input::InputFrame;
use platform_engine::foundation::math::utils::sign;
use platform_engine::foundation::math::Vec2;

impl PlayerController {
    pub(super) fn handle_jump_input(&mut self, input: &InputFrame, delta_time: f32, io: &mut PlayerIo<'_>) {
        if self.is(PlayerFlags::HIT_SPRING) {
            self.spring_jump(io);
        }

        let pressed = self.state.buttons.jump_pressed(input);
        match self.state.control {
            ControlState::Normal => {
                io.motion.acceleration.y = self.gravity(input, io.motion.velocity.y);

                if !self.is(PlayerFlags::JUMPING) {
                    if pressed {
                        if self.is(PlayerFlags::GROUNDED) || self.can_buffer_jump() {
                            self.jump(io);
                        } else if self.state.is_touching_wall() {
                            self.wall_jump(self.state.wall_jump_dir(), io);
                        } else {
                            self.start_jump_queue();
                        }
                    } else if self.can_queue_jump() {
                        self.jump(io);
                    } else if self.can_queue_wall_jump() {
                        self.wall_jump(self.state.wall_jump_dir(), io);
                    }
                } else if io.motion.velocity.y <= 0.0 {
                    self.state.set(PlayerFlags::JUMPING, false);
                    self.state.set(PlayerFlags::SPRING_JUMPING, false);
                    if !self.is(PlayerFlags::GROUNDED) {
                        self.play_animation(io, AnimationCue::Falling, 1.0);
                    }
                }

                if self.is(PlayerFlags::WALL_JUMPING) {
                    self.state.timers.wall_jump_time += delta_time;
                    if self.state.timers.wall_jump_time > self.tunables.max_wall_jump_time {
                        self.state.set(PlayerFlags::WALL_JUMPING, false);
                    }
                }

                let velocity = &mut io.motion.velocity;
                if self.is(PlayerFlags::WALL_SLIDING) && velocity.y < -self.tunables.max_wall_slide_speed {
                    velocity.y = -self.tunables.max_wall_slide_speed;
                }
                if velocity.y.abs() > self.tunables.max_y_speed && !self.is(PlayerFlags::SPRING_JUMPING) {
                    velocity.y = self.tunables.max_y_speed * sign(velocity.y);
                }
            }
            ControlState::Dashing => {
                // Dashes ignore gravity but still accept jumps
                if pressed {
                    if self.is(PlayerFlags::GROUNDED) || self.can_buffer_jump() {
                        self.jump(io);
                    } else {
                        self.start_jump_queue();
                    }
                } else if self.can_queue_jump() {
                    self.jump(io);
                }
            }
            ControlState::Climbing => {}
        }

        if !self.is(PlayerFlags::GROUNDED) {
            self.state.timers.time_since_grounded += delta_time;
        }
        if self.is(PlayerFlags::JUMP_QUEUED) {
            self.state.timers.jump_queue_time += delta_time;
        }
    }

    /// Downward acceleration for the current sub-state
    fn gravity(&self, input: &InputFrame, velocity_y: f32) -> f32 {
        let t = &self.tunables;
        if self.is(PlayerFlags::GROUNDED) {
            0.0
        } else if !self.is(PlayerFlags::JUMPING) {
            if self.is(PlayerFlags::WALL_SLIDING) {
                -t.wall_slide_gravity_scale
            } else {
                -t.gravity_scale
            }
        } else if self.is(PlayerFlags::SPRING_JUMPING) {
            -t.spring_jump_gravity_scale
        } else if input.jump_held() && velocity_y > 0.0 {
            -t.jump_gravity_scale
        } else {
            -t.stop_jump_gravity_scale
        }
    }

    pub(super) fn jump(&mut self, io: &mut PlayerIo<'_>) {
        self.state.set(PlayerFlags::JUMPING | PlayerFlags::HAS_JUMPED, true);
        self.state.set(PlayerFlags::JUMP_QUEUED, false);

        io.motion.velocity.y = self.tunables.jump_speed;

        io.emit(Cue::Sound(SoundCue::Jump));
        io.emit(Cue::Haptic(HapticCue::Jump));
        if io.motion.velocity.x == 0.0 {
            self.play_animation(io, AnimationCue::Jumped, 1.0);
        } else {
            self.play_animation(io, AnimationCue::RunJump, 0.8);
        }
    }

    /// Jump away from a wall; `dir` is the horizontal launch direction
    pub(super) fn wall_jump(&mut self, dir: f32, io: &mut PlayerIo<'_>) {
        self.state.set(PlayerFlags::WALL_JUMPING, true);
        self.state.timers.wall_jump_time = 0.0;
        io.motion.acceleration.x = 0.0;
        io.motion.velocity.x = dir * self.tunables.wall_jump_h_speed;

        self.jump(io);
        self.play_animation(io, AnimationCue::WallJump, 1.5);
    }

    fn spring_jump(&mut self, io: &mut PlayerIo<'_>) {
        match self.state.control {
            ControlState::Dashing => self.end_dash(io.clock),
            ControlState::Climbing => self.stop_climb(io),
            ControlState::Normal => {}
        }
        self.state.control = ControlState::Normal;
        self.state.set(PlayerFlags::HIT_SPRING, false);
        self.state.set(PlayerFlags::JUMPING | PlayerFlags::SPRING_JUMPING, true);

        io.motion.velocity = Vec2::new(0.0, self.tunables.spring_jump_speed);
        Self::shake_camera(
            io,
            Vec2::y(),
            self.tunables.spring_jump_cam_shake_dist,
            self.tunables.spring_jump_cam_shake_time,
        );
    }

    /// A press made in the air that may still fire
    fn start_jump_queue(&mut self) {
        self.state.set(PlayerFlags::JUMP_QUEUED, true);
        self.state.timers.jump_queue_time = 0.0;
    }

    fn can_buffer_jump(&self) -> bool {
        self.state.timers.time_since_grounded < self.tunables.max_jump_buffer_time
            && !self.is(PlayerFlags::HAS_JUMPED)
    }

    fn queued_jump_alive(&self) -> bool {
        self.is(PlayerFlags::JUMP_QUEUED) && self.state.timers.jump_queue_time < self.tunables.max_jump_queue_time
    }

    fn can_queue_jump(&self) -> bool {
        self.queued_jump_alive() && self.is(PlayerFlags::GROUNDED)
    }

    fn can_queue_wall_jump(&self) -> bool {
        self.queued_jump_alive() && self.state.is_touching_wall()
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::Harness;
    use super::super::TriggerContacts;
    use super::*;
    use approx::assert_relative_eq;

    fn airborne() -> TriggerContacts {
        TriggerContacts::default()
    }

    #[test]
    fn test_jump_from_ground() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        h.control(InputFrame::idle().with_jump(), &ground);

        assert!(h.controller.is(PlayerFlags::JUMPING));
        assert_relative_eq!(h.motion.velocity.y, h.tunables().jump_speed);
        assert!(h.cues().contains(&Cue::Sound(SoundCue::Jump)));
    }

    #[test]
    fn test_holding_jump_keeps_lighter_gravity() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        h.step(InputFrame::idle().with_jump(), &ground);

        h.step(InputFrame::idle().with_jump(), &airborne());
        assert_relative_eq!(h.motion.acceleration.y, -h.tunables().jump_gravity_scale);

        h.step(InputFrame::idle(), &airborne());
        assert_relative_eq!(h.motion.acceleration.y, -h.tunables().stop_jump_gravity_scale);
    }

    #[test]
    fn test_buffered_jump_inside_window() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        // Walked off the ledge two ticks ago
        h.step(InputFrame::idle(), &airborne());
        h.step(InputFrame::idle(), &airborne());
        assert!(h.controller.state().timers.time_since_grounded < h.tunables().max_jump_buffer_time);

        h.control(InputFrame::idle().with_jump(), &airborne());
        assert!(h.controller.is(PlayerFlags::JUMPING));
        assert_relative_eq!(h.motion.velocity.y, h.tunables().jump_speed);
    }

    #[test]
    fn test_buffered_jump_outside_window_is_queued() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        for _ in 0..10 {
            h.step(InputFrame::idle(), &airborne());
        }
        assert!(h.controller.state().timers.time_since_grounded > h.tunables().max_jump_buffer_time);

        h.control(InputFrame::idle().with_jump(), &airborne());
        assert!(!h.controller.is(PlayerFlags::JUMPING));
        assert!(h.controller.is(PlayerFlags::JUMP_QUEUED));
        assert!(h.motion.velocity.y < 0.0);
    }

    #[test]
    fn test_queued_jump_fires_on_landing() {
        let mut h = Harness::new();
        for _ in 0..10 {
            h.step(InputFrame::idle(), &airborne());
        }
        h.step(InputFrame::idle().with_jump(), &airborne());
        assert!(h.controller.is(PlayerFlags::JUMP_QUEUED));

        let ground = h.ground();
        h.control(InputFrame::idle().with_jump(), &ground);
        assert!(h.controller.is(PlayerFlags::JUMPING));
        assert!(!h.controller.is(PlayerFlags::JUMP_QUEUED));
    }

    #[test]
    fn test_stale_queued_jump_does_not_fire() {
        let mut h = Harness::new();
        for _ in 0..10 {
            h.step(InputFrame::idle(), &airborne());
        }
        h.step(InputFrame::idle().with_jump(), &airborne());
        for _ in 0..10 {
            h.step(InputFrame::idle(), &airborne());
        }

        let ground = h.ground();
        h.control(InputFrame::idle(), &ground);
        assert!(!h.controller.is(PlayerFlags::JUMPING));
    }

    #[test]
    fn test_wall_jump_pushes_away_and_locks_run() {
        let mut h = Harness::new();
        for _ in 0..10 {
            h.step(InputFrame::idle(), &airborne());
        }
        let wall = h.right_wall();
        h.control(InputFrame::idle().with_jump(), &wall);

        assert!(h.controller.is(PlayerFlags::WALL_JUMPING));
        assert_relative_eq!(h.motion.velocity.x, -h.tunables().wall_jump_h_speed);
        assert_relative_eq!(h.motion.velocity.y, h.tunables().jump_speed);
    }

    #[test]
    fn test_fall_speed_is_clamped() {
        let mut h = Harness::new();
        h.motion.velocity.y = -100.0;
        h.control(InputFrame::idle(), &airborne());
        assert_relative_eq!(h.motion.velocity.y, -h.tunables().max_y_speed);
    }

    #[test]
    fn test_spring_launch_ignores_speed_limit() {
        let mut h = Harness::new();
        let ground = h.ground();
        h.step(InputFrame::idle(), &ground);
        h.controller.hit_spring(&mut h.cues);
        h.control(InputFrame::idle(), &airborne());

        assert!(h.controller.is(PlayerFlags::SPRING_JUMPING));
        assert_relative_eq!(h.motion.velocity.y, h.tunables().spring_jump_speed);
        assert_relative_eq!(h.motion.acceleration.y, -h.tunables().spring_jump_gravity_scale);
    }
}
