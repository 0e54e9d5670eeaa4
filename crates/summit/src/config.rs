//! Game configuration
//!
//! Everything here is read from a TOML file at startup and can be re-read
//! while the game runs. Missing fields fall back to the defaults below.
//! Speeds are in tiles per second, times in seconds unless noted.

use platform_engine::config::{Config, ConfigError, Deserialize, Serialize};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics::{BodyTemplate, ColliderTemplate};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player movement tunables
    pub player: PlayerTunables,

    /// Player colliders: one solid box plus ground, right and left triggers
    pub player_body: PlayerBodyConfig,

    /// Scene transition settings
    pub scene_exit: SceneExitConfig,

    /// Out-of-bounds death settings
    pub death_pit: DeathPitConfig,

    /// Respawn settings
    pub spawnpoint: SpawnpointConfig,

    /// Dash crystal settings
    pub crystal: CrystalConfig,

    /// Crumbling platform settings
    pub crumbling_platform: CrumblingPlatformConfig,

    /// Strawberry settings
    pub strawberry: StrawberryConfig,

    /// Simulation settings
    pub simulation: SimulationConfig,
}

impl Config for GameConfig {}

/// Player movement tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    /// Time to reach max run speed from rest
    pub run_accel_time: f32,

    /// Time to stop from max run speed
    pub run_decel_time: f32,

    /// Max run speed
    pub max_run_speed: f32,

    /// Run speed below which the player stops dead
    pub min_run_speed: f32,

    /// Gravity while falling
    pub gravity_scale: f32,

    /// Gravity while rising with jump held
    pub jump_gravity_scale: f32,

    /// Gravity while rising after jump is released
    pub stop_jump_gravity_scale: f32,

    /// Gravity while sliding down a wall
    pub wall_slide_gravity_scale: f32,

    /// Gravity during a spring jump
    pub spring_jump_gravity_scale: f32,

    /// Vertical take-off speed of a jump
    pub jump_speed: f32,

    /// Horizontal take-off speed of a wall jump
    pub wall_jump_h_speed: f32,

    /// Vertical launch speed of a spring
    pub spring_jump_speed: f32,

    /// Vertical speed limit outside spring jumps
    pub max_y_speed: f32,

    /// Falling speed above which grabbing a wall slows the fall
    pub min_wall_slide_speed: f32,

    /// Falling speed limit while wall sliding
    pub max_wall_slide_speed: f32,

    /// Factor applied to falling speed when a wall slide starts
    pub wall_slide_speed_mult: f32,

    /// How long a wall jump locks run control
    pub max_wall_jump_time: f32,

    /// How long after leaving the ground a jump still counts as grounded
    pub max_jump_buffer_time: f32,

    /// How long an early jump press waits for ground or wall
    pub max_jump_queue_time: f32,

    /// Camera shake distance on spring jumps
    pub spring_jump_cam_shake_dist: f32,

    /// Camera shake duration on spring jumps
    pub spring_jump_cam_shake_time: f32,

    /// Dashes available between landings
    pub max_dash_count: u32,

    /// Dash speed
    pub dash_speed: f32,

    /// Time to shed dash speed once the dash is over
    pub dash_decel_time: f32,

    /// Length of the full-speed part of a dash
    pub max_dash_time: f32,

    /// Length of the slow motion at the start of a dash
    pub dash_slow_time: f32,

    /// Time scale during the slow motion
    pub dash_slow_time_scale: f32,

    /// Camera shake distance on dashes
    pub dash_cam_shake_dist: f32,

    /// Camera shake duration on dashes
    pub dash_cam_shake_time: f32,

    /// Climb stamina after landing
    pub climb_max_stamina: f32,

    /// Stamina per second spent climbing up
    pub climb_up_cost: f32,

    /// Stamina per second spent holding still
    pub climb_still_cost: f32,

    /// Stamina spent by a straight-up climb jump
    pub climb_jump_cost: f32,

    /// Climb up speed limit
    pub max_climb_up_speed: f32,

    /// Slip speed once stamina runs out
    pub max_climb_slip_speed: f32,

    /// Climb down speed limit
    pub max_climb_down_speed: f32,

    /// Climb speed below which the player holds still
    pub min_climb_speed: f32,

    /// Time to reach climb speed
    pub climb_accel_time: f32,

    /// Time to reach slip speed
    pub climb_slip_accel_time: f32,

    /// Time to stop climbing
    pub climb_decel_time: f32,

    /// Vertical speed when vaulting over the top of a wall
    pub climb_vault_speed: f32,

    /// Gravity during a vault
    pub climb_vault_gravity: f32,

    /// Horizontal speed during a vault
    pub climb_vault_h_speed: f32,

    /// Length of a vault
    pub max_climb_vault_time: f32,

    /// Camera shake distance on death
    pub death_cam_shake_dist: f32,

    /// Camera shake duration on death
    pub death_cam_shake_time: f32,

    /// Time to turn around, in milliseconds
    pub flip_time: u32,
}

/// Player collider layout
///
/// Trigger order matters: the controller reads the first trigger as the
/// ground sensor, the second as the right wall sensor and the third as the
/// left wall sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBodyConfig {
    /// Body template, origin at the player's feet
    pub template: BodyTemplate,
}

/// Scene transition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneExitConfig {
    /// Launch speed into the next scene
    pub exit_speed: f32,

    /// How long input stays locked during the transition
    pub exit_time: f32,
}

/// Out-of-bounds death settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathPitConfig {
    /// Distance outside the current scene at which the player dies
    pub out_of_bounds_range: f32,
}

/// Respawn settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnpointConfig {
    /// Pause between death and respawn
    pub respawn_pause_time: f32,

    /// Where to respawn when the scene has no matching spawnpoint
    pub fallback_position: (f32, f32),
}

/// Dash crystal settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrystalConfig {
    /// How long a used crystal stays gone
    pub respawn_time: f32,
}

/// Crumbling platform settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrumblingPlatformConfig {
    /// How long a platform holds once stood on
    pub crumble_time: f32,

    /// How long a crumbled platform stays gone
    pub respawn_time: f32,
}

/// Strawberry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrawberryConfig {
    /// Distance a carried strawberry keeps from the player
    pub follow_distance: f32,

    /// How quickly a carried strawberry catches up
    pub follow_smoothing: f32,
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one tick
    pub fixed_timestep: f32,
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            run_accel_time: 0.1,
            run_decel_time: 0.05,
            max_run_speed: 8.0,
            min_run_speed: 0.5,

            gravity_scale: 70.0,
            jump_gravity_scale: 35.0,
            stop_jump_gravity_scale: 90.0,
            wall_slide_gravity_scale: 20.0,
            spring_jump_gravity_scale: 40.0,

            jump_speed: 14.0,
            wall_jump_h_speed: 8.0,
            spring_jump_speed: 20.0,
            max_y_speed: 20.0,
            min_wall_slide_speed: 2.0,
            max_wall_slide_speed: 5.0,
            wall_slide_speed_mult: 0.5,

            max_wall_jump_time: 0.15,
            max_jump_buffer_time: 0.1,
            max_jump_queue_time: 0.1,

            spring_jump_cam_shake_dist: 0.2,
            spring_jump_cam_shake_time: 0.2,

            max_dash_count: 1,
            dash_speed: 24.0,
            dash_decel_time: 0.1,
            max_dash_time: 0.15,
            dash_slow_time: 0.05,
            dash_slow_time_scale: 0.2,
            dash_cam_shake_dist: 0.15,
            dash_cam_shake_time: 0.15,

            climb_max_stamina: 110.0,
            climb_up_cost: 45.0,
            climb_still_cost: 10.0,
            climb_jump_cost: 27.5,

            max_climb_up_speed: 5.0,
            max_climb_slip_speed: 3.0,
            max_climb_down_speed: 7.0,
            min_climb_speed: 0.5,
            climb_accel_time: 0.1,
            climb_slip_accel_time: 0.2,
            climb_decel_time: 0.05,

            climb_vault_speed: 12.0,
            climb_vault_gravity: 60.0,
            climb_vault_h_speed: 4.0,
            max_climb_vault_time: 0.15,

            death_cam_shake_dist: 0.3,
            death_cam_shake_time: 0.3,

            flip_time: 150,
        }
    }
}

impl Default for PlayerBodyConfig {
    fn default() -> Self {
        let mut template = BodyTemplate::fixed(vec![
            ColliderTemplate::solid(Vec2::new(0.0, 0.5), Vec2::new(0.8, 1.0)),
            // Ground
            ColliderTemplate::solid(Vec2::new(0.0, -0.05), Vec2::new(0.6, 0.2)).as_trigger(),
            // Right wall
            ColliderTemplate::solid(Vec2::new(0.475, 0.5), Vec2::new(0.15, 0.8)).as_trigger(),
            // Left wall
            ColliderTemplate::solid(Vec2::new(-0.475, 0.5), Vec2::new(0.15, 0.8)).as_trigger(),
        ]);
        template.moveable = true;
        Self { template }
    }
}

impl Default for SceneExitConfig {
    fn default() -> Self {
        Self {
            exit_speed: 6.0,
            exit_time: 0.4,
        }
    }
}

impl Default for DeathPitConfig {
    fn default() -> Self {
        Self {
            out_of_bounds_range: 2.0,
        }
    }
}

impl Default for SpawnpointConfig {
    fn default() -> Self {
        Self {
            respawn_pause_time: 1.0,
            fallback_position: (20.0, 5.0),
        }
    }
}

impl Default for CrystalConfig {
    fn default() -> Self {
        Self { respawn_time: 2.5 }
    }
}

impl Default for CrumblingPlatformConfig {
    fn default() -> Self {
        Self {
            crumble_time: 0.5,
            respawn_time: 2.0,
        }
    }
}

impl Default for StrawberryConfig {
    fn default() -> Self {
        Self {
            follow_distance: 1.0,
            follow_smoothing: 5.0,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

fn require_positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {value}")))
    }
}

impl PlayerTunables {
    /// Reject values the controller divides by or cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let divisors = [
            ("player.run_accel_time", self.run_accel_time),
            ("player.run_decel_time", self.run_decel_time),
            ("player.max_run_speed", self.max_run_speed),
            ("player.dash_speed", self.dash_speed),
            ("player.dash_decel_time", self.dash_decel_time),
            ("player.max_dash_time", self.max_dash_time),
            ("player.dash_slow_time_scale", self.dash_slow_time_scale),
            ("player.wall_slide_speed_mult", self.wall_slide_speed_mult),
            ("player.climb_max_stamina", self.climb_max_stamina),
            ("player.climb_accel_time", self.climb_accel_time),
            ("player.climb_slip_accel_time", self.climb_slip_accel_time),
            ("player.climb_decel_time", self.climb_decel_time),
        ];
        for (field, value) in divisors {
            require_positive(field, value)?;
        }
        if self.flip_time == 0 {
            return Err(ConfigError::invalid("player.flip_time", "must be at least one millisecond"));
        }
        if self.min_run_speed > self.max_run_speed {
            return Err(ConfigError::invalid("player.min_run_speed", "exceeds max_run_speed"));
        }
        Ok(())
    }
}

impl GameConfig {
    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;

        if self.player_body.template.colliders.iter().filter(|c| c.trigger).count() < 3 {
            return Err(ConfigError::invalid(
                "player_body.template.colliders",
                "needs ground, right and left triggers",
            ));
        }

        require_positive("scene_exit.exit_time", self.scene_exit.exit_time)?;
        require_positive("spawnpoint.respawn_pause_time", self.spawnpoint.respawn_pause_time)?;
        require_positive("crystal.respawn_time", self.crystal.respawn_time)?;
        require_positive("crumbling_platform.crumble_time", self.crumbling_platform.crumble_time)?;
        require_positive("crumbling_platform.respawn_time", self.crumbling_platform.respawn_time)?;
        require_positive("simulation.fixed_timestep", self.simulation.fixed_timestep)?;

        if self.death_pit.out_of_bounds_range < 0.0 {
            return Err(ConfigError::invalid("death_pit.out_of_bounds_range", "must not be negative"));
        }
        Ok(())
    }

    /// Load and validate a configuration file
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [player]
            max_run_speed = 10.0

            [crystal]
            respawn_time = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.player.max_run_speed, 10.0);
        assert_eq!(config.player.jump_speed, PlayerTunables::default().jump_speed);
        assert_eq!(config.crystal.respawn_time, 4.0);
        assert_eq!(config.player_body, PlayerBodyConfig::default());
    }

    #[test]
    fn test_zero_time_constant_is_rejected() {
        let mut config = GameConfig::default();
        config.player.run_accel_time = 0.0;
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "player.run_accel_time"),
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_player_body_needs_three_triggers() {
        let mut config = GameConfig::default();
        config.player_body.template.colliders.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_player_body_trigger_order() {
        let body = PlayerBodyConfig::default();
        let triggers: Vec<&ColliderTemplate> = body.template.colliders.iter().filter(|c| c.trigger).collect();
        assert_eq!(triggers.len(), 3);
        // Ground below the feet, then right, then left
        assert!(triggers[0].offset.1 < 0.0);
        assert!(triggers[1].offset.0 > 0.0);
        assert!(triggers[2].offset.0 < 0.0);
    }
}
