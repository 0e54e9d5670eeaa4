//! Drives a controller without a physics world

use super::{PlayerController, PlayerFrame, PlayerIo, PlayerOutcome, TriggerContacts};
use crate::config::PlayerTunables;
use crate::cues::Cue;
use crate::input::InputFrame;
use platform_engine::ecs::{Entity, World};
use platform_engine::events::EventQueue;
use platform_engine::foundation::time::SimulationClock;
use platform_engine::physics::Motion;

pub(crate) const DT: f32 = 1.0 / 60.0;

pub(crate) struct Harness {
    pub controller: PlayerController,
    pub motion: Motion,
    pub clock: SimulationClock,
    pub cues: EventQueue<Cue>,
    pub in_bounds: bool,
    pub floor: Entity,
    pub wall: Entity,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_tunables(PlayerTunables::default())
    }

    pub fn with_tunables(tunables: PlayerTunables) -> Self {
        let mut world = World::new();
        Self {
            controller: PlayerController::new(tunables),
            motion: Motion::new(),
            clock: SimulationClock::new(),
            cues: EventQueue::new(),
            in_bounds: true,
            floor: world.create_entity(),
            wall: world.create_entity(),
        }
    }

    pub fn tunables(&self) -> &PlayerTunables {
        self.controller.tunables()
    }

    /// Advance the clock, run the controller, then integrate motion the way
    /// the resolver would with nothing in the way
    pub fn step(&mut self, input: InputFrame, triggers: &TriggerContacts) -> PlayerOutcome {
        let outcome = self.control(input, triggers);
        self.motion.integrate(self.clock.delta_time());
        outcome
    }

    /// Advance the clock and run the controller only
    pub fn control(&mut self, input: InputFrame, triggers: &TriggerContacts) -> PlayerOutcome {
        let delta_time = self.clock.advance(DT);
        let frame = PlayerFrame {
            input,
            delta_time,
            in_bounds: self.in_bounds,
            triggers,
        };
        let mut io = PlayerIo {
            motion: &mut self.motion,
            clock: &mut self.clock,
            cues: &mut self.cues,
        };
        self.controller.update(&frame, &mut io)
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.cues.pending().to_vec()
    }

    pub fn ground(&self) -> TriggerContacts {
        TriggerContacts {
            ground: vec![self.floor],
            ..TriggerContacts::default()
        }
    }

    pub fn right_wall(&self) -> TriggerContacts {
        TriggerContacts {
            right: vec![self.wall],
            ..TriggerContacts::default()
        }
    }

    pub fn left_wall(&self) -> TriggerContacts {
        TriggerContacts {
            left: vec![self.wall],
            ..TriggerContacts::default()
        }
    }

    pub fn ground_and_right_wall(&self) -> TriggerContacts {
        TriggerContacts {
            ground: vec![self.floor],
            right: vec![self.wall],
            ..TriggerContacts::default()
        }
    }
}
