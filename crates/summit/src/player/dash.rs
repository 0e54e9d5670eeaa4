//! Dashing
//!
//! A dash launches the player at a fixed speed for a short time with gravity
//! off, slows the whole simulation briefly, then decelerates back to normal
//! control.

use super::state::{ControlState, PlayerFlags};
use super::{PlayerController, PlayerIo};
use crate::cues::{AnimationCue, Cue, HapticCue, SoundCue};
use crate::input::InputFrame;
use platform_engine::foundation::math::utils::{normalize_or, sign};
use platform_engine::foundation::math::Vec2;
use platform_engine::foundation::time::SimulationClock;

impl PlayerController {
    pub(super) fn handle_dash_input(&mut self, input: &InputFrame, delta_time: f32, io: &mut PlayerIo<'_>) {
        let can_dash = self.state.buttons.dash_pressed(input) && self.state.dash_count > 0;

        match self.state.control {
            ControlState::Normal => {
                if can_dash {
                    self.dash(input, io);
                }
            }
            ControlState::Dashing => {
                self.state.timers.dash_time += delta_time;
                let dash_time = self.state.timers.dash_time;
                let t = &self.tunables;

                if dash_time > t.dash_slow_time {
                    io.clock.reset_time_scale();
                }
                if dash_time < t.max_dash_time {
                    return;
                }

                self.state.set(PlayerFlags::DASH_DECELERATING, true);
                let dir = self.state.dash_direction;
                let decel = t.dash_speed / t.dash_decel_time;
                if dir.y > 0.0 {
                    io.motion.acceleration.y = decel * -dir.y;
                }
                io.motion.acceleration.x = decel * -dir.x;

                let velocity = io.velocity();
                if dash_time >= t.max_dash_time + t.dash_decel_time
                    || sign(velocity.x) != sign(dir.x)
                    || sign(velocity.y) != sign(dir.y)
                {
                    self.end_dash(io.clock);
                }

                if can_dash {
                    self.end_dash(io.clock);
                    self.dash(input, io);
                }
            }
            ControlState::Climbing => {
                if can_dash {
                    self.stop_climb(io);
                    self.dash(input, io);
                }
            }
        }
    }

    fn dash(&mut self, input: &InputFrame, io: &mut PlayerIo<'_>) {
        let t = &self.tunables;
        self.state.control = ControlState::Dashing;
        self.state.dash_count = self.state.dash_count.saturating_sub(1);
        self.state.timers.dash_time = 0.0;
        io.clock.set_time_scale(t.dash_slow_time_scale);

        let fallback = Vec2::new(self.state.last_x_axis, 0.0);
        let wanted = if input.x_axis != 0.0 || input.y_axis != 0.0 {
            Vec2::new(input.x_axis, input.y_axis)
        } else {
            fallback
        };
        let dir = normalize_or(wanted, Vec2::x());
        self.state.dash_direction = dir;

        io.motion.velocity = dir * t.dash_speed;
        io.motion.acceleration = Vec2::zeros();

        io.emit(Cue::Sound(SoundCue::Dash));
        io.emit(Cue::Haptic(HapticCue::Dash));
        Self::shake_camera(io, dir, -t.dash_cam_shake_dist, t.dash_cam_shake_time);

        let animation = if dir.y == 0.0 {
            AnimationCue::DashLeftRight
        } else if dir.x == 0.0 {
            if dir.y < 0.0 {
                AnimationCue::DashDown
            } else {
                AnimationCue::DashUp
            }
        } else if dir.y < 0.0 {
            AnimationCue::DashDiagonalDown
        } else {
            AnimationCue::DashDiagonalUp
        };
        self.play_animation(io, animation, 1.0);

        log::debug!("Dash toward ({:.2}, {:.2}), {} left", dir.x, dir.y, self.state.dash_count);
    }

    /// Leave the dash and restore normal time
    pub(super) fn end_dash(&mut self, clock: &mut SimulationClock) {
        if self.state.control == ControlState::Dashing {
            self.state.control = ControlState::Normal;
        }
        self.state.set(PlayerFlags::DASH_DECELERATING, false);
        clock.reset_time_scale();
    }
}
