//! Cues emitted by gameplay for collaborators to act on
//!
//! Animation, audio, haptics, camera and scene logic all live elsewhere;
//! gameplay only describes what happened as plain records queued on an
//! [`EventQueue<Cue>`](platform_engine::events::EventQueue).

use nalgebra::Unit;
use platform_engine::ecs::Entity;
use platform_engine::foundation::math::Vec2;

/// Player animation requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationCue {
    /// Standing still on the ground
    Idle,
    /// Running on the ground
    Running,
    /// Jump from standing
    Jumped,
    /// Jump while running
    RunJump,
    /// Jump off a wall
    WallJump,
    /// Falling after the top of a jump
    Falling,
    /// Touched down
    Landed,
    /// Horizontal dash
    DashLeftRight,
    /// Straight up dash
    DashUp,
    /// Straight down dash
    DashDown,
    /// Diagonal dash upward
    DashDiagonalUp,
    /// Diagonal dash downward
    DashDiagonalDown,
    /// Climbing up a wall
    Climbing,
    /// Holding on to a wall
    Hanging,
}

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Jump take-off
    Jump,
    /// Landing
    Land,
    /// Dash start
    Dash,
    /// Player death
    Die,
}

/// Controller vibration requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticCue {
    /// Jump take-off
    Jump,
    /// Landing after a fall
    LandGround,
    /// Dash start
    Dash,
    /// Spring launch
    SpringBounce,
    /// Player death
    PlayerDeath,
}

/// Camera shake request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShake {
    /// Direction of the shake
    pub direction: Unit<Vec2>,
    /// Distance of the shake; negative shakes against the direction
    pub distance: f32,
    /// Duration in seconds
    pub duration: f32,
}

impl CameraShake {
    /// Shake along `direction`, or to the right when it has no length
    pub fn new(direction: Vec2, distance: f32, duration: f32) -> Self {
        let direction = Unit::try_new(direction, f32::EPSILON).unwrap_or_else(Vec2::x_axis);
        Self {
            direction,
            distance,
            duration,
        }
    }
}

/// Gameplay milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayEvent {
    /// The player died
    PlayerDestroyed,
    /// The player came back at a spawnpoint
    PlayerRespawned,
    /// Carried strawberries were banked by landing
    StrawberriesCollected,
    /// A crystal was used up
    CrystalCollected(Entity),
    /// The player started moving into another scene
    SceneEntered {
        /// Scene being entered
        scene: u16,
        /// Scene being left
        previous: u16,
    },
}

/// The player started or stopped standing on or clinging to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    /// Started standing on the entity
    EnterStand(Entity),
    /// Stopped standing on the entity
    ExitStand(Entity),
    /// Started clinging to the entity
    EnterClimb(Entity),
    /// Stopped clinging to the entity
    ExitClimb(Entity),
}

impl TouchEvent {
    /// The entity touched
    pub fn entity(&self) -> Entity {
        match *self {
            Self::EnterStand(e) | Self::ExitStand(e) | Self::EnterClimb(e) | Self::ExitClimb(e) => e,
        }
    }
}

/// Anything gameplay tells the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// Switch animation
    Animation {
        /// Animation to play
        cue: AnimationCue,
        /// Playback speed multiplier
        speed: f32,
    },
    /// Play a sound
    Sound(SoundCue),
    /// Vibrate the controller
    Haptic(HapticCue),
    /// Shake the camera
    CameraShake(CameraShake),
    /// Gameplay milestone
    Play(PlayEvent),
    /// Touch change
    Touch(TouchEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shake_direction_is_normalized() {
        let shake = CameraShake::new(Vec2::new(3.0, 4.0), 0.5, 0.2);
        assert_relative_eq!(shake.direction.x, 0.6);
        assert_relative_eq!(shake.direction.y, 0.8);
    }

    #[test]
    fn test_zero_shake_direction_falls_back_to_right() {
        let shake = CameraShake::new(Vec2::zeros(), 0.5, 0.2);
        assert_eq!(shake.direction.into_inner(), Vec2::new(1.0, 0.0));
    }
}
