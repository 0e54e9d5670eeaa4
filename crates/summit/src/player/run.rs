//! Horizontal movement

use super::state::{ControlState, PlayerFlags};
use super::{PlayerController, PlayerIo};
use crate::cues::AnimationCue;
use crate::input::InputFrame;
use platform_engine::foundation::math::utils::sign;

impl PlayerController {
    pub(super) fn handle_movement_input(&mut self, input: &InputFrame, delta_time: f32, io: &mut PlayerIo<'_>) {
        let x_axis = input.x_axis;
        let run_accel = self.tunables.max_run_speed / self.tunables.run_accel_time;

        match self.state.control {
            ControlState::Normal => {
                if self.is(PlayerFlags::WALL_JUMPING) {
                    return;
                }
                self.run(x_axis, delta_time, io);

                if self.is(PlayerFlags::GROUNDED) {
                    let velocity_x = io.motion.velocity.x;
                    if velocity_x != 0.0 && x_axis != 0.0 {
                        let speed = velocity_x.abs() / self.tunables.max_run_speed;
                        self.play_animation(io, AnimationCue::Running, speed);
                    } else {
                        self.play_animation(io, AnimationCue::Idle, 1.0);
                    }
                }

                self.state.facing.update(x_axis, self.tunables.flip_time, delta_time);
            }
            ControlState::Dashing => {
                if x_axis != 0.0 && self.is(PlayerFlags::DASH_DECELERATING) {
                    io.motion.acceleration.x += run_accel * x_axis;
                }
            }
            ControlState::Climbing => {}
        }
    }

    /// Accelerate toward the input direction or brake to a stop, never ending
    /// the tick above max run speed
    fn run(&mut self, x_axis: f32, delta_time: f32, io: &mut PlayerIo<'_>) {
        let max_speed = self.tunables.max_run_speed;
        let motion = &mut *io.motion;

        if x_axis != 0.0 {
            motion.acceleration.x = (max_speed / self.tunables.run_accel_time) * x_axis;
            if self.state.is(PlayerFlags::GROUNDED) && motion.velocity.x == 0.0 {
                motion.velocity.x = max_speed * x_axis;
            }
        } else if motion.velocity.x != 0.0 {
            let braking = (max_speed / self.tunables.run_decel_time) * -sign(motion.velocity.x);
            let next = motion.velocity.x + braking * delta_time;
            if motion.velocity.x.abs() < self.tunables.min_run_speed || sign(next) != sign(motion.velocity.x) {
                motion.acceleration.x = 0.0;
                motion.velocity.x = 0.0;
            } else {
                motion.acceleration.x = braking;
            }
        }

        let projected = motion.velocity.x + motion.acceleration.x * delta_time;
        if projected.abs() > max_speed {
            motion.acceleration.x = 0.0;
            motion.velocity.x = max_speed * sign(projected);
        }
    }
}
