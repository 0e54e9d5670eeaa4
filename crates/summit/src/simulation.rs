//! One fixed tick of gameplay
//!
//! Order within a tick:
//! 1. advance the clock (dash slow motion scales the result)
//! 2. run the player controller against last tick's sensor contacts
//! 3. resolve movement, then update contacts
//! 4. apply tile interactions from new contacts and new cues
//! 5. advance tile timers, scene transitions and respawns on unscaled time
//! 6. clean up entities queued for destruction

use crate::config::GameConfig;
use crate::cues::{Cue, PlayEvent, TouchEvent};
use crate::input::InputFrame;
use crate::level::{LevelData, LevelError, LevelManager, Progress, TileKind};
use crate::player::{PlayerController, PlayerFrame, PlayerIo, PlayerOutcome, TriggerContacts};
use platform_engine::config::{Config, ConfigError};
use platform_engine::ecs::{Entity, World};
use platform_engine::events::{EventHandler, EventQueue};
use platform_engine::foundation::math::utils::normalize_or;
use platform_engine::foundation::math::Vec2;
use platform_engine::foundation::time::SimulationClock;
use platform_engine::physics::{
    Body, BodyHandle, CollisionResolver, ContactEvent, ContactTracker, PhysicsWorld,
};
use std::path::Path;

/// Simulation errors
#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    /// Level data problem
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Game configuration problem
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Player, level and physics stepped together
pub struct Simulation {
    config: GameConfig,
    world: World,
    physics: PhysicsWorld,
    resolver: CollisionResolver,
    tracker: ContactTracker,
    clock: SimulationClock,
    cues: EventQueue<Cue>,
    level: LevelManager,
    player: PlayerController,
    player_entity: Entity,
    player_body: BodyHandle,
    respawn_timer: Option<f32>,
    scene_exit_timer: Option<f32>,
    contact_events: Vec<ContactEvent>,
}

impl Simulation {
    /// Start a fresh game
    pub fn new(config: GameConfig, level_data: LevelData) -> Result<Self, SimulationError> {
        let progress = Progress::new(level_data.start_scene);
        Self::resume(config, level_data, progress)
    }

    /// Continue from a save slot
    pub fn resume(config: GameConfig, level_data: LevelData, progress: Progress) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut level = LevelManager::with_progress(level_data, progress)?;
        level.reset(&mut world, &mut physics)?;

        let fallback = Vec2::new(config.spawnpoint.fallback_position.0, config.spawnpoint.fallback_position.1);
        let spawn = level.spawn_position(fallback);
        let player_entity = world.create_entity();
        let player_body =
            physics.spawn_body(Body::from_template(&config.player_body.template, player_entity, spawn).moveable());

        log::info!(
            "Simulation ready: scene {}, player at ({:.2}, {:.2}), {} bodies",
            level.current_scene(),
            spawn.x,
            spawn.y,
            physics.len()
        );

        Ok(Self {
            player: PlayerController::new(config.player.clone()),
            config,
            world,
            physics,
            resolver: CollisionResolver::new(),
            tracker: ContactTracker::new(),
            clock: SimulationClock::new(),
            cues: EventQueue::new(),
            level,
            player_entity,
            player_body,
            respawn_timer: None,
            scene_exit_timer: None,
            contact_events: Vec::new(),
        })
    }

    /// Load game configuration and level from files and start a fresh game
    pub fn from_files(config_path: impl AsRef<Path>, level_path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let config = GameConfig::load_validated(config_path)?;
        let level_data = LevelData::load_validated(level_path)?;
        Self::new(config, level_data)
    }

    /// Run one tick of `raw_delta` seconds of wall time
    pub fn tick(&mut self, input: InputFrame, raw_delta: f32) -> Result<(), SimulationError> {
        let delta_time = self.clock.advance(raw_delta);
        let first_new_cue = self.cues.pending().len();

        if self.respawn_timer.is_none() {
            self.update_player(input, delta_time);
        }

        self.resolver.step(&mut self.physics, delta_time);
        self.tracker.update(&mut self.physics);
        self.contact_events = self.physics.drain_events();
        self.handle_contacts()?;
        self.handle_cues(first_new_cue);

        self.level.update_tiles(
            raw_delta,
            &self.config.crystal,
            &self.config.crumbling_platform,
            &mut self.physics,
        );
        let player_position = self.player_position();
        self.level
            .follow_player(player_position, raw_delta, &self.config.strawberry, &mut self.physics);

        self.update_scene_exit(raw_delta);
        self.update_respawn(raw_delta);
        self.flush_destroyed();
        Ok(())
    }

    fn update_player(&mut self, input: InputFrame, delta_time: f32) {
        let triggers = TriggerContacts::read(&self.physics, self.player_body);
        let in_bounds = self
            .level
            .is_in_bounds(self.player_position(), self.config.death_pit.out_of_bounds_range);
        let frame = PlayerFrame {
            input,
            delta_time,
            in_bounds,
            triggers: &triggers,
        };

        let Some(body) = self.physics.body_mut(self.player_body) else {
            return;
        };
        let mut io = PlayerIo {
            motion: &mut body.motion,
            clock: &mut self.clock,
            cues: &mut self.cues,
        };
        if self.player.update(&frame, &mut io) == PlayerOutcome::Died {
            self.on_player_died();
        }
    }

    fn on_player_died(&mut self) {
        self.physics.set_collidable(self.player_body, false);
        self.physics.set_moveable(self.player_body, false);
        self.level.drop_strawberries(&mut self.physics);
        self.level.record_death();
        self.respawn_timer = Some(0.0);
    }

    fn handle_contacts(&mut self) -> Result<(), SimulationError> {
        let entered: Vec<Entity> = self
            .contact_events
            .iter()
            .filter_map(|event| match event {
                ContactEvent::Entered(pair) if pair.solid_owner == self.player_entity => Some(pair.trigger_owner),
                _ => None,
            })
            .collect();

        for tile in entered {
            match self.level.kind_of(tile) {
                Some(TileKind::Spring) => self.player.hit_spring(&mut self.cues),
                Some(TileKind::Spikes) => self.player.kill(),
                Some(TileKind::Crystal) => {
                    if self.player.can_replenish() && self.level.collect_crystal(tile, &mut self.physics) {
                        self.player.replenish();
                        self.cues.send(Cue::Play(PlayEvent::CrystalCollected(tile)));
                    }
                }
                Some(TileKind::Strawberry) => {
                    if self.level.carry_strawberry(tile, &mut self.physics) {
                        self.player.hit_strawberry();
                    }
                }
                Some(TileKind::SceneExit) => self.take_scene_exit(tile)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn take_scene_exit(&mut self, exit: Entity) -> Result<(), SimulationError> {
        let (Some(target), Some(record)) = (self.level.scene_exit_target(exit), self.level.tile(exit)) else {
            return Ok(());
        };
        let exit_position = record.home;
        let previous = self.level.current_scene();
        if !self.level.enter_scene(target, &mut self.world, &mut self.physics)? {
            return Ok(());
        }

        let launch = self
            .level
            .closest_tile_of_scene(exit_position, target)
            .map(|closest| normalize_or(closest - exit_position, Vec2::zeros()) * self.config.scene_exit.exit_speed)
            .unwrap_or_else(Vec2::zeros);
        if let Some(body) = self.physics.body_mut(self.player_body) {
            self.player.begin_scene_exit(launch, &mut body.motion, &mut self.clock);
        }

        self.scene_exit_timer = Some(0.0);
        self.cues.send(Cue::Play(PlayEvent::SceneEntered { scene: target, previous }));
        Ok(())
    }

    fn handle_cues(&mut self, first_new_cue: usize) {
        let new_cues: Vec<Cue> = self.cues.pending().iter().skip(first_new_cue).copied().collect();
        for cue in new_cues {
            match cue {
                Cue::Touch(TouchEvent::EnterStand(entity) | TouchEvent::EnterClimb(entity)) => {
                    self.level.touch_crumbling(entity);
                }
                Cue::Touch(TouchEvent::ExitStand(entity) | TouchEvent::ExitClimb(entity)) => {
                    self.level.release_crumbling(entity, &mut self.physics);
                }
                Cue::Play(PlayEvent::StrawberriesCollected) => {
                    self.level.bank_strawberries();
                }
                _ => {}
            }
        }
    }

    fn update_scene_exit(&mut self, raw_delta: f32) {
        let Some(elapsed) = self.scene_exit_timer.as_mut() else {
            return;
        };
        *elapsed += raw_delta;
        if *elapsed < self.config.scene_exit.exit_time {
            return;
        }

        self.scene_exit_timer = None;
        self.level.finish_enter_scene();
        self.player.finish_scene_exit();
        log::info!("Now in scene {}", self.level.current_scene());
    }

    fn update_respawn(&mut self, raw_delta: f32) {
        let Some(elapsed) = self.respawn_timer.as_mut() else {
            return;
        };
        *elapsed += raw_delta;
        if *elapsed < self.config.spawnpoint.respawn_pause_time {
            return;
        }

        self.respawn_timer = None;
        let fallback = Vec2::new(
            self.config.spawnpoint.fallback_position.0,
            self.config.spawnpoint.fallback_position.1,
        );
        let spawn = self.level.spawn_position(fallback);
        self.physics.set_position(self.player_body, spawn);
        self.physics.set_collidable(self.player_body, true);
        self.physics.set_moveable(self.player_body, true);
        if let Some(body) = self.physics.body_mut(self.player_body) {
            body.motion.stop();
        }
        self.clock.reset_time_scale();
        self.player.respawn();
        self.cues.send(Cue::Play(PlayEvent::PlayerRespawned));
        log::info!("Player respawned at ({:.2}, {:.2})", spawn.x, spawn.y);
    }

    fn flush_destroyed(&mut self) {
        for entity in self.world.flush_destroyed() {
            let bodies = self.physics.destroy_bodies_of(entity);
            self.level.forget_tile(entity);
            log::trace!("Destroyed {} with {} bodies", entity, bodies);
        }
    }

    /// Queue a scene's tiles for destruction at the end of the next tick
    pub fn unload_scene(&mut self, scene: u16) {
        self.level.unload_scene(scene, &mut self.world);
    }

    /// Re-read the game configuration, keeping all live state
    pub fn reload_config(&mut self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        let config = GameConfig::load_validated(path)?;
        self.apply_config(config);
        Ok(())
    }

    /// Swap in new tunables. The player body keeps its current colliders.
    pub fn apply_config(&mut self, config: GameConfig) {
        self.player.set_tunables(config.player.clone());
        self.config = config;
        log::info!("Game configuration applied");
    }

    /// Write the save slot
    pub fn save_progress(&self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        self.level.progress().save_to_file(path)?;
        Ok(())
    }

    /// Move the player and stop it
    pub fn teleport_player(&mut self, position: Vec2) {
        self.physics.set_position(self.player_body, position);
        if let Some(body) = self.physics.body_mut(self.player_body) {
            body.motion.stop();
        }
    }

    /// Add a consumer for [`dispatch_cues`](Self::dispatch_cues)
    pub fn register_cue_handler(&mut self, handler: Box<dyn EventHandler<Cue>>) {
        self.cues.register_handler(handler);
    }

    /// Hand every pending cue to the registered handlers
    pub fn dispatch_cues(&mut self) {
        self.cues.dispatch();
    }

    /// Take every pending cue
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        self.cues.drain()
    }

    /// Cues waiting to be dispatched or drained
    pub fn pending_cues(&self) -> &[Cue] {
        self.cues.pending()
    }

    /// Player body position, or the origin if the body is gone
    pub fn player_position(&self) -> Vec2 {
        self.physics
            .body(self.player_body)
            .map_or_else(Vec2::zeros, Body::position)
    }

    /// Player body velocity
    pub fn player_velocity(&self) -> Vec2 {
        self.physics
            .body(self.player_body)
            .map_or_else(Vec2::zeros, |body| body.motion.velocity)
    }

    /// Is the player dead and waiting to respawn?
    pub fn is_respawning(&self) -> bool {
        self.respawn_timer.is_some()
    }

    /// Contact changes from the last tick
    pub fn contact_events(&self) -> &[ContactEvent] {
        &self.contact_events
    }

    /// Player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// Player entity
    pub fn player_entity(&self) -> Entity {
        self.player_entity
    }

    /// Player body handle
    pub fn player_body(&self) -> BodyHandle {
        self.player_body
    }

    /// Level state
    pub fn level(&self) -> &LevelManager {
        &self.level
    }

    /// Physics state
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Entity registry
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Simulation clock
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
