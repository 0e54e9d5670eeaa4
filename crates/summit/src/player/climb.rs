//! Climbing, wall slides and vaults

use super::state::{ControlState, PlayerFlags};
use super::{PlayerController, PlayerIo};
use crate::cues::{AnimationCue, TouchEvent};
use crate::input::InputFrame;
use platform_engine::foundation::math::utils::sign;
use platform_engine::foundation::math::Vec2;

impl PlayerController {
    pub(super) fn handle_climb_input(&mut self, input: &InputFrame, delta_time: f32, io: &mut PlayerIo<'_>) {
        let climb = input.climb_held();
        let x_axis = input.x_axis;

        match self.state.control {
            ControlState::Normal => {
                if climb && self.can_start_climb(x_axis) {
                    self.start_climb(x_axis, io);
                } else if x_axis != 0.0 && self.can_start_climb(x_axis) && io.motion.velocity.y < 0.0 {
                    self.start_wall_slide(io);
                } else {
                    self.stop_wall_slide();
                }
            }
            ControlState::Dashing => {
                if climb && self.can_start_climb(x_axis) {
                    self.start_climb(x_axis, io);
                }
            }
            ControlState::Climbing => {
                if self.is(PlayerFlags::CLIMB_VAULTING) {
                    self.vault_tick(climb, x_axis, delta_time, io);
                } else if !climb {
                    self.stop_climb(io);
                } else if !self.state.is_touching_wall() {
                    let dir = if self.is(PlayerFlags::CLIMBING_RIGHT_WALL) { 1.0 } else { -1.0 };
                    self.fall_off_climb(dir, io);
                } else if self.state.climb_stamina > 0.0 {
                    self.climb(input, delta_time, io);
                } else {
                    self.slip(input, io);
                }
            }
        }
    }

    /// Is there a wall in the held (or last held) direction, and is the
    /// player not rising from a jump?
    fn can_start_climb(&self, x_axis: f32) -> bool {
        let dir = if x_axis != 0.0 { x_axis } else { self.state.last_x_axis };
        !self.is(PlayerFlags::JUMPING)
            && ((dir > 0.0 && self.is(PlayerFlags::TOUCHING_RIGHT_WALL))
                || (dir < 0.0 && self.is(PlayerFlags::TOUCHING_LEFT_WALL)))
    }

    fn start_climb(&mut self, x_axis: f32, io: &mut PlayerIo<'_>) {
        if self.state.control == ControlState::Dashing {
            self.end_dash(io.clock);
        }
        self.state.control = ControlState::Climbing;

        let dir = if x_axis != 0.0 { x_axis } else { self.state.last_x_axis };
        let right = dir > 0.0;
        self.state.set(PlayerFlags::CLIMBING_RIGHT_WALL, right);

        io.motion.stop();

        let climbed = self.state.touching.climbed(right).to_vec();
        Self::touch(io, climbed.into_iter().map(TouchEvent::EnterClimb));
        self.play_animation(io, AnimationCue::Hanging, 1.0);
        log::debug!("Climb started on the {} wall", if right { "right" } else { "left" });
    }

    /// Let go of the wall
    pub(super) fn stop_climb(&mut self, io: &mut PlayerIo<'_>) {
        self.state.control = ControlState::Normal;
        self.state.set(PlayerFlags::CLIMB_VAULTING, false);

        let climbed = self
            .state
            .touching
            .climbed(self.is(PlayerFlags::CLIMBING_RIGHT_WALL))
            .to_vec();
        Self::touch(io, climbed.into_iter().map(TouchEvent::ExitClimb));
    }

    /// The wall ran out under a climbing player: vault over it when moving
    /// up, otherwise drop off
    pub(super) fn fall_off_climb(&mut self, dir: f32, io: &mut PlayerIo<'_>) {
        if io.motion.velocity.y > 0.0 {
            self.vault(dir, io);
        } else {
            self.stop_climb(io);
        }
    }

    fn vault(&mut self, dir: f32, io: &mut PlayerIo<'_>) {
        let t = &self.tunables;
        self.state.set(PlayerFlags::CLIMB_VAULTING, true);
        self.state.timers.climb_vault_time = 0.0;
        self.state.climb_vault_dir = dir;

        io.motion.velocity = Vec2::new(t.climb_vault_h_speed * dir, t.climb_vault_speed);
        io.motion.acceleration.y = -t.climb_vault_gravity;
    }

    fn vault_tick(&mut self, climb: bool, x_axis: f32, delta_time: f32, io: &mut PlayerIo<'_>) {
        if climb && self.can_start_climb(x_axis) {
            self.stop_climb(io);
            self.start_climb(x_axis, io);
        }

        self.state.timers.climb_vault_time += delta_time;
        io.motion.velocity.x = self.tunables.climb_vault_h_speed * self.state.climb_vault_dir;
        if self.state.timers.climb_vault_time > self.tunables.max_climb_vault_time {
            self.stop_climb(io);
        }
    }

    fn climb(&mut self, input: &InputFrame, delta_time: f32, io: &mut PlayerIo<'_>) {
        let t = self.tunables.clone();
        let motion = &mut *io.motion;

        if self.state.buttons.jump_pressed(input) {
            self.stop_climb(io);
            if input.x_axis != 0.0 {
                self.wall_jump(self.state.wall_jump_dir(), io);
            } else {
                self.state.climb_stamina -= t.climb_jump_cost;
                self.jump(io);
            }
            return;
        }

        if input.y_axis > 0.0 {
            self.state.climb_stamina -= t.climb_up_cost * delta_time;
            if motion.velocity.y > t.max_climb_up_speed {
                motion.velocity.y = t.max_climb_up_speed;
                motion.acceleration.y = 0.0;
            } else {
                motion.acceleration.y = t.max_climb_up_speed / t.climb_accel_time;
            }
            self.play_animation(io, AnimationCue::Climbing, 2.0);
        } else if input.y_axis < 0.0 {
            if motion.velocity.y < -t.max_climb_down_speed {
                motion.velocity.y = -t.max_climb_down_speed;
                motion.acceleration.y = 0.0;
            } else {
                motion.acceleration.y = -t.max_climb_down_speed / t.climb_accel_time;
            }
            self.play_animation(io, AnimationCue::Hanging, 1.0);
        } else {
            self.state.climb_stamina -= t.climb_still_cost * delta_time;
            if motion.velocity.y.abs() < t.min_climb_speed {
                motion.velocity.y = 0.0;
                motion.acceleration.y = 0.0;
            } else {
                motion.acceleration.y = (t.max_climb_up_speed / t.climb_decel_time) * -sign(motion.velocity.y);
            }
            self.play_animation(io, AnimationCue::Hanging, 1.0);
        }
    }

    /// Out of stamina: slide down unless jumping off
    fn slip(&mut self, input: &InputFrame, io: &mut PlayerIo<'_>) {
        if self.state.buttons.jump_pressed(input) {
            self.stop_climb(io);
            self.wall_jump(self.state.wall_jump_dir(), io);
        } else {
            let t = &self.tunables;
            let motion = &mut *io.motion;
            if motion.velocity.y < -t.max_climb_slip_speed {
                motion.velocity.y = -t.max_climb_slip_speed;
                motion.acceleration.y = 0.0;
            } else {
                motion.acceleration.y = -t.max_climb_slip_speed / t.climb_slip_accel_time;
            }
        }
        self.play_animation(io, AnimationCue::Hanging, 1.0);
    }

    fn start_wall_slide(&mut self, io: &mut PlayerIo<'_>) {
        if self.is(PlayerFlags::WALL_SLIDING) {
            return;
        }
        self.state.set(PlayerFlags::WALL_SLIDING, true);

        let t = &self.tunables;
        if io.motion.velocity.y < -t.min_wall_slide_speed / t.wall_slide_speed_mult {
            io.motion.velocity.y *= t.wall_slide_speed_mult;
        }
    }

    fn stop_wall_slide(&mut self) {
        self.state.set(PlayerFlags::WALL_SLIDING, false);
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::{Harness, DT};
    use super::super::TriggerContacts;
    use super::*;
    use crate::cues::Cue;
    use approx::assert_relative_eq;

    fn climb_right() -> InputFrame {
        InputFrame::idle().with_axes(1.0, 0.0).with_climb()
    }

    #[test]
    fn test_grounded_climb_against_right_wall() {
        let mut h = Harness::new();
        let contacts = h.ground_and_right_wall();

        h.step(climb_right(), &contacts);
        assert_eq!(h.controller.control(), ControlState::Climbing);
        assert!(h.controller.is(PlayerFlags::CLIMBING_RIGHT_WALL));

        h.step(climb_right(), &contacts);
        assert_eq!(h.controller.control(), ControlState::Climbing);
        assert_eq!(h.motion.velocity, Vec2::zeros());
        let t = h.tunables();
        assert_relative_eq!(
            h.controller.state().climb_stamina,
            t.climb_max_stamina - t.climb_still_cost * DT,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_climb_touch_events() {
        let mut h = Harness::new();
        let contacts = h.ground_and_right_wall();
        h.step(climb_right(), &contacts);
        assert!(h.cues().contains(&Cue::Touch(TouchEvent::EnterClimb(h.wall))));

        h.step(InputFrame::idle().with_axes(1.0, 0.0), &contacts);
        assert_eq!(h.controller.control(), ControlState::Normal);
        assert!(h.cues().contains(&Cue::Touch(TouchEvent::ExitClimb(h.wall))));
    }

    #[test]
    fn test_cannot_climb_away_from_wall() {
        let mut h = Harness::new();
        let contacts = h.ground_and_right_wall();
        h.step(InputFrame::idle().with_axes(-1.0, 0.0).with_climb(), &contacts);
        assert_eq!(h.controller.control(), ControlState::Normal);
    }

    #[test]
    fn test_climbing_up_drains_stamina_until_slipping() {
        let mut h = Harness::new();
        let wall = h.right_wall();
        for _ in 0..5 {
            h.step(InputFrame::idle(), &TriggerContacts::default());
        }
        h.step(climb_right(), &wall);
        assert_eq!(h.controller.control(), ControlState::Climbing);

        let up = InputFrame::idle().with_axes(1.0, 1.0).with_climb();
        h.step(up, &wall);
        assert!(h.motion.acceleration.y > 0.0);
        assert!(h.controller.state().climb_stamina < h.tunables().climb_max_stamina);

        h.controller.state_mut().climb_stamina = 1.0;
        for _ in 0..3 {
            h.step(up, &wall);
        }
        assert!(h.controller.state().climb_stamina <= 0.0);
        assert_eq!(h.controller.control(), ControlState::Climbing);
        let t = h.tunables();
        assert_relative_eq!(
            h.motion.acceleration.y,
            -t.max_climb_slip_speed / t.climb_slip_accel_time
        );
    }

    #[test]
    fn test_climb_speed_is_capped() {
        let mut h = Harness::new();
        let wall = h.right_wall();
        h.step(climb_right(), &wall);
        let up = InputFrame::idle().with_axes(1.0, 1.0).with_climb();
        for _ in 0..30 {
            h.step(up, &wall);
        }
        assert!(h.motion.velocity.y <= h.tunables().max_climb_up_speed + 1.0);
        h.step(up, &wall);
        h.control(up, &wall);
        assert_relative_eq!(h.motion.velocity.y, h.tunables().max_climb_up_speed);
    }

    #[test]
    fn test_vault_when_wall_ends_while_rising() {
        let mut h = Harness::new();
        let wall = h.right_wall();
        h.step(climb_right(), &wall);
        let up = InputFrame::idle().with_axes(1.0, 1.0).with_climb();
        h.step(up, &wall);
        h.step(up, &wall);
        assert!(h.motion.velocity.y > 0.0);

        h.control(up, &TriggerContacts::default());
        assert!(h.controller.is(PlayerFlags::CLIMB_VAULTING));
        assert_relative_eq!(h.motion.velocity.x, h.tunables().climb_vault_h_speed);

        for _ in 0..15 {
            h.step(up, &TriggerContacts::default());
        }
        assert_eq!(h.controller.control(), ControlState::Normal);
        assert!(!h.controller.is(PlayerFlags::CLIMB_VAULTING));
    }

    #[test]
    fn test_neutral_jump_from_climb_costs_stamina() {
        let mut h = Harness::new();
        let wall = h.right_wall();
        h.step(climb_right(), &wall);

        let before = h.controller.state().climb_stamina;
        h.control(InputFrame::idle().with_climb().with_jump(), &wall);
        assert_eq!(h.controller.control(), ControlState::Normal);
        assert!(h.controller.is(PlayerFlags::JUMPING));
        assert_relative_eq!(
            h.controller.state().climb_stamina,
            before - h.tunables().climb_jump_cost
        );
    }

    #[test]
    fn test_wall_slide_slows_fall_once() {
        let mut h = Harness::new();
        h.motion.velocity.y = -10.0;
        let wall = h.right_wall();
        h.control(InputFrame::idle().with_axes(1.0, 0.0), &wall);

        assert!(h.controller.is(PlayerFlags::WALL_SLIDING));
        assert_relative_eq!(h.motion.velocity.y, -h.tunables().max_wall_slide_speed);
        assert_relative_eq!(h.motion.acceleration.y, -h.tunables().wall_slide_gravity_scale);
    }
}
