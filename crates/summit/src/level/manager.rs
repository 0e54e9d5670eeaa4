//! Live scenes
//!
//! Scenes are loaded lazily: loading stamps out one static body per tile,
//! hiding turns their collision off, destroying removes the bodies. The
//! current scene and its neighbors are kept shown; entering a scene through
//! an exit shows the target's neighborhood and hides everything else.
//!
//! Tile behavior that outlives a single contact (crystals regrowing,
//! platforms crumbling, strawberries trailing the player) is tracked here as
//! a [`TileState`] per tile entity.

use super::progress::Progress;
use super::tileset::{LevelData, TileKind};
use super::LevelError;
use crate::config::{CrumblingPlatformConfig, CrystalConfig, StrawberryConfig};
use platform_engine::ecs::{Entity, World};
use platform_engine::foundation::math::utils::{distance, lerp};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics::{Body, BodyHandle, PhysicsWorld};
use std::collections::BTreeMap;

/// Per-tile state beyond what the tilemap says
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileState {
    /// Present
    Active,
    /// A crumbling platform with someone on it; seconds since first touch
    Touched(f32),
    /// A crumbling platform that gave way; seconds since
    Crumbled(f32),
    /// A used crystal; seconds since
    Collected(f32),
    /// A strawberry trailing the player
    Following,
    /// A strawberry collected for good
    Banked,
}

impl TileState {
    fn is_present(self) -> bool {
        matches!(self, Self::Active | Self::Touched(_))
    }
}

/// A spawned tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    /// Owning scene
    pub scene: u16,
    /// Grid row
    pub row: u32,
    /// Grid column
    pub col: u32,
    /// Behavior
    pub kind: TileKind,
    /// Orientation from the tilemap; the target scene for exits
    pub orientation: u16,
    /// Physics body
    pub body: BodyHandle,
    /// Spawn position
    pub home: Vec2,
    /// Behavior state
    pub state: TileState,
    /// Whether the tile's scene is shown
    pub shown: bool,
}

impl TileRecord {
    /// Should the body take part in collision?
    pub fn is_collidable(&self) -> bool {
        self.shown && self.state.is_present()
    }

    fn sync(&self, physics: &mut PhysicsWorld) {
        physics.set_collidable(self.body, self.is_collidable());
    }
}

/// Owns level data, progress and every live tile
#[derive(Debug)]
pub struct LevelManager {
    data: LevelData,
    progress: Progress,
    current_scene: u16,
    next_scene: u16,
    loaded_scenes: Vec<u16>,
    tiles: BTreeMap<Entity, TileRecord>,
}

impl LevelManager {
    /// Start a fresh game in the level's start scene
    pub fn new(data: LevelData) -> Result<Self, LevelError> {
        let progress = Progress::new(data.start_scene);
        Self::with_progress(data, progress)
    }

    /// Resume from a save slot
    pub fn with_progress(data: LevelData, progress: Progress) -> Result<Self, LevelError> {
        data.validate()?;
        data.scene(progress.scene).ok_or(LevelError::UnknownScene(progress.scene))?;
        Ok(Self {
            current_scene: progress.scene,
            next_scene: progress.scene,
            data,
            progress,
            loaded_scenes: Vec::new(),
            tiles: BTreeMap::new(),
        })
    }

    /// Level definition
    pub fn data(&self) -> &LevelData {
        &self.data
    }

    /// Save slot
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Scene the player is in
    pub fn current_scene(&self) -> u16 {
        self.current_scene
    }

    /// Scene being entered, or the current one
    pub fn next_scene(&self) -> u16 {
        self.next_scene
    }

    /// Is a scene transition under way?
    pub fn is_entering_scene(&self) -> bool {
        self.next_scene != self.current_scene
    }

    /// Scenes with spawned tiles, in load order
    pub fn loaded_scenes(&self) -> &[u16] {
        &self.loaded_scenes
    }

    /// Is the scene loaded?
    pub fn is_scene_loaded(&self, scene: u16) -> bool {
        self.loaded_scenes.contains(&scene)
    }

    /// Tile record for an entity
    pub fn tile(&self, entity: Entity) -> Option<&TileRecord> {
        self.tiles.get(&entity)
    }

    /// Every live tile
    pub fn tiles(&self) -> impl Iterator<Item = (Entity, &TileRecord)> {
        self.tiles.iter().map(|(&entity, record)| (entity, record))
    }

    /// Behavior of a tile entity
    pub fn kind_of(&self, entity: Entity) -> Option<TileKind> {
        self.tiles.get(&entity).map(|record| record.kind)
    }

    /// Scene a scene-exit tile leads to
    pub fn scene_exit_target(&self, entity: Entity) -> Option<u16> {
        self.tiles
            .get(&entity)
            .filter(|record| record.kind == TileKind::SceneExit)
            .map(|record| record.orientation)
    }

    /// Throw away every tile and show the saved scene and its neighbors
    pub fn reset(&mut self, world: &mut World, physics: &mut PhysicsWorld) -> Result<(), LevelError> {
        let entities: Vec<Entity> = self.tiles.keys().copied().collect();
        for entity in entities {
            self.despawn_tile(entity, world, physics);
        }

        self.current_scene = self.progress.scene;
        self.next_scene = self.progress.scene;
        self.loaded_scenes.clear();

        self.show_scene(self.current_scene, world, physics)?;
        self.show_scene_neighbors(self.current_scene, world, physics)?;
        log::info!(
            "Level reset in scene {} ({} scenes loaded)",
            self.current_scene,
            self.loaded_scenes.len()
        );
        Ok(())
    }

    /// Spawn a body for every tile of a scene
    pub fn load_scene(&mut self, scene: u16, world: &mut World, physics: &mut PhysicsWorld) -> Result<(), LevelError> {
        if self.is_scene_loaded(scene) {
            return Ok(());
        }
        let tilemap = self.data.scene(scene).ok_or(LevelError::UnknownScene(scene))?;

        let mut spawned = Vec::new();
        for (row, col, tile) in tilemap.occupied() {
            let (tileset, template) = self.data.resolve(tile)?;
            let position = tilemap.world_position(row, col);
            let entity = world.create_entity();
            let body = physics.spawn_body(Body::from_template(template, entity, position));

            let state = if tileset.kind == TileKind::Strawberry && self.progress.has_strawberry(scene) {
                TileState::Banked
            } else {
                TileState::Active
            };
            let record = TileRecord {
                scene,
                row,
                col,
                kind: tileset.kind,
                orientation: tile.orientation,
                body,
                home: position,
                state,
                shown: true,
            };
            record.sync(physics);
            spawned.push((entity, record));
        }

        log::info!("Loaded scene {} with {} tiles", scene, spawned.len());
        self.tiles.extend(spawned);
        self.loaded_scenes.push(scene);
        Ok(())
    }

    /// Turn a loaded scene's collision back on, loading it first if needed
    pub fn show_scene(&mut self, scene: u16, world: &mut World, physics: &mut PhysicsWorld) -> Result<(), LevelError> {
        if !self.is_scene_loaded(scene) {
            return self.load_scene(scene, world, physics);
        }
        for record in self.tiles.values_mut().filter(|r| r.scene == scene) {
            record.shown = true;
            record.sync(physics);
        }
        log::debug!("Showing scene {}", scene);
        Ok(())
    }

    /// Show every neighbor of a scene
    pub fn show_scene_neighbors(
        &mut self,
        scene: u16,
        world: &mut World,
        physics: &mut PhysicsWorld,
    ) -> Result<(), LevelError> {
        let neighbors = self.data.scene(scene).ok_or(LevelError::UnknownScene(scene))?.neighbors.clone();
        for neighbor in neighbors {
            self.show_scene(neighbor, world, physics)?;
        }
        Ok(())
    }

    /// Turn a scene's collision off, leaving carried strawberries alone
    pub fn hide_scene(&mut self, scene: u16, physics: &mut PhysicsWorld) {
        for record in self.tiles.values_mut().filter(|r| r.scene == scene) {
            if record.state == TileState::Following {
                continue;
            }
            record.shown = false;
            record.sync(physics);
        }
        log::debug!("Hiding scene {}", scene);
    }

    /// Hide every loaded scene that is neither `scene` nor one of its neighbors
    pub fn hide_non_neighbor_scenes(&mut self, scene: u16, physics: &mut PhysicsWorld) {
        let neighbors = self
            .data
            .scene(scene)
            .map(|tilemap| tilemap.neighbors.clone())
            .unwrap_or_default();
        let to_hide: Vec<u16> = self
            .loaded_scenes
            .iter()
            .copied()
            .filter(|&loaded| loaded != scene && !neighbors.contains(&loaded))
            .collect();
        for loaded in to_hide {
            self.hide_scene(loaded, physics);
        }
    }

    /// Remove every tile of a scene right away. Returns how many were removed.
    pub fn destroy_scene(&mut self, scene: u16, world: &mut World, physics: &mut PhysicsWorld) -> usize {
        let entities = self.entities_of(scene);
        for &entity in &entities {
            self.despawn_tile(entity, world, physics);
        }
        self.loaded_scenes.retain(|&loaded| loaded != scene);
        entities.len()
    }

    /// Queue every tile of a scene for removal at the end of the tick
    pub fn unload_scene(&mut self, scene: u16, world: &mut World) {
        for entity in self.entities_of(scene) {
            world.queue_destroy(entity);
        }
        self.loaded_scenes.retain(|&loaded| loaded != scene);
        log::info!("Unloading scene {}", scene);
    }

    /// Drop the record of a tile whose entity was destroyed
    pub fn forget_tile(&mut self, entity: Entity) -> Option<TileRecord> {
        self.tiles.remove(&entity)
    }

    fn entities_of(&self, scene: u16) -> Vec<Entity> {
        self.tiles
            .iter()
            .filter(|(_, record)| record.scene == scene)
            .map(|(&entity, _)| entity)
            .collect()
    }

    fn despawn_tile(&mut self, entity: Entity, world: &mut World, physics: &mut PhysicsWorld) {
        if let Some(record) = self.tiles.remove(&entity) {
            physics.destroy_body(record.body);
        }
        world.destroy_entity(entity);
    }

    /// Can the player start entering `scene`?
    pub fn can_enter_scene(&self, scene: u16) -> bool {
        scene != self.current_scene && self.next_scene == self.current_scene
    }

    /// Begin entering a scene: show its neighborhood, hide the rest and
    /// record the move. Returns false when a transition is already running
    /// or the player is already there.
    pub fn enter_scene(&mut self, scene: u16, world: &mut World, physics: &mut PhysicsWorld) -> Result<bool, LevelError> {
        if !self.can_enter_scene(scene) {
            return Ok(false);
        }
        self.data.scene(scene).ok_or(LevelError::UnknownScene(scene))?;

        self.next_scene = scene;
        self.show_scene(scene, world, physics)?;
        self.show_scene_neighbors(scene, world, physics)?;
        self.progress.enter_scene(scene, self.current_scene);
        self.hide_non_neighbor_scenes(scene, physics);

        log::info!("Entering scene {} from {}", scene, self.current_scene);
        Ok(true)
    }

    /// The transition is over
    pub fn finish_enter_scene(&mut self) {
        self.current_scene = self.next_scene;
    }

    /// First scene whose footprint holds the point
    pub fn scene_at_point(&self, point: Vec2) -> Option<u16> {
        self.data
            .scenes
            .iter()
            .position(|scene| scene.is_point_inside(point))
            .and_then(|index| u16::try_from(index).ok())
    }

    fn adjacent_points(point: Vec2) -> [Vec2; 4] {
        [
            Vec2::new(point.x - 1.0, point.y),
            Vec2::new(point.x + 1.0, point.y),
            Vec2::new(point.x, point.y + 1.0),
            Vec2::new(point.x, point.y - 1.0),
        ]
    }

    /// Scenes one tile left, right, above or below the point
    pub fn scenes_around_point(&self, point: Vec2) -> Vec<u16> {
        let mut scenes = Vec::new();
        for adjacent in Self::adjacent_points(point) {
            if let Some(scene) = self.scene_at_point(adjacent) {
                if !scenes.contains(&scene) {
                    scenes.push(scene);
                }
            }
        }
        scenes
    }

    /// The first of the four adjacent tile positions that lies in `scene`
    pub fn closest_tile_of_scene(&self, point: Vec2, scene: u16) -> Option<Vec2> {
        Self::adjacent_points(point)
            .into_iter()
            .find(|&adjacent| self.scene_at_point(adjacent) == Some(scene))
    }

    /// Where the player (re)appears: the current scene's spawnpoint for the
    /// previous scene, nudged up, or `fallback`
    pub fn spawn_position(&self, fallback: Vec2) -> Vec2 {
        self.data
            .scene(self.progress.scene)
            .and_then(|scene| scene.spawnpoint_from(self.progress.previous_scene))
            .map(|spawnpoint| spawnpoint.position() + Vec2::new(0.0, 0.1))
            .unwrap_or(fallback)
    }

    /// Is the point near the current scene or inside any scene?
    pub fn is_in_bounds(&self, point: Vec2, range: f32) -> bool {
        let near_current = self
            .data
            .scene(self.progress.scene)
            .is_some_and(|scene| scene.is_point_in_range(range, point));
        near_current || self.scene_at_point(point).is_some()
    }

    /// Count a death
    pub fn record_death(&mut self) {
        self.progress.record_death();
    }

    /// Use up a crystal. Returns false if it is not an available crystal.
    pub fn collect_crystal(&mut self, entity: Entity, physics: &mut PhysicsWorld) -> bool {
        self.transition(entity, physics, |record| {
            (record.kind == TileKind::Crystal && record.state == TileState::Active).then_some(TileState::Collected(0.0))
        })
    }

    /// Someone stood on or grabbed a crumbling platform
    pub fn touch_crumbling(&mut self, entity: Entity) -> bool {
        match self.tiles.get_mut(&entity) {
            Some(record) if record.kind == TileKind::CrumblingPlatform && record.state == TileState::Active => {
                record.state = TileState::Touched(0.0);
                true
            }
            _ => false,
        }
    }

    /// Someone let go of a touched crumbling platform: it gives way at once
    pub fn release_crumbling(&mut self, entity: Entity, physics: &mut PhysicsWorld) -> bool {
        self.transition(entity, physics, |record| {
            matches!(record.state, TileState::Touched(_)).then_some(TileState::Crumbled(0.0))
        })
    }

    /// Pick up a strawberry
    pub fn carry_strawberry(&mut self, entity: Entity, physics: &mut PhysicsWorld) -> bool {
        self.transition(entity, physics, |record| {
            (record.kind == TileKind::Strawberry && record.state == TileState::Active).then_some(TileState::Following)
        })
    }

    /// Collect every carried strawberry. Returns how many were new.
    pub fn bank_strawberries(&mut self) -> usize {
        let mut banked = 0;
        for record in self.tiles.values_mut() {
            if record.state == TileState::Following {
                record.state = TileState::Banked;
                if self.progress.collect_strawberry(record.scene) {
                    banked += 1;
                }
            }
        }
        if banked > 0 {
            log::info!("Collected {} strawberries ({} total)", banked, self.progress.strawberry_count());
        }
        banked
    }

    /// Send carried strawberries back where they came from
    pub fn drop_strawberries(&mut self, physics: &mut PhysicsWorld) {
        for record in self.tiles.values_mut() {
            if record.state == TileState::Following {
                record.state = TileState::Active;
                physics.set_position(record.body, record.home);
                record.sync(physics);
            }
        }
    }

    /// Advance crystal regrowth and platform crumbling
    pub fn update_tiles(
        &mut self,
        delta_time: f32,
        crystal: &CrystalConfig,
        crumbling: &CrumblingPlatformConfig,
        physics: &mut PhysicsWorld,
    ) {
        for record in self.tiles.values_mut() {
            let next = match record.state {
                TileState::Touched(t) if t + delta_time > crumbling.crumble_time => TileState::Crumbled(0.0),
                TileState::Touched(t) => TileState::Touched(t + delta_time),
                TileState::Crumbled(t) if t + delta_time > crumbling.respawn_time => TileState::Active,
                TileState::Crumbled(t) => TileState::Crumbled(t + delta_time),
                TileState::Collected(t) if t + delta_time > crystal.respawn_time => TileState::Active,
                TileState::Collected(t) => TileState::Collected(t + delta_time),
                state => state,
            };
            let was_present = record.state.is_present();
            record.state = next;
            if was_present != next.is_present() {
                log::debug!("Tile at {}:{},{} is now {:?}", record.scene, record.row, record.col, next);
                record.sync(physics);
            }
        }
    }

    /// Ease carried strawberries toward the player while they lag behind
    pub fn follow_player(
        &mut self,
        player_position: Vec2,
        delta_time: f32,
        strawberry: &StrawberryConfig,
        physics: &mut PhysicsWorld,
    ) {
        let t = (strawberry.follow_smoothing * delta_time).min(1.0);
        for record in self.tiles.values().filter(|r| r.state == TileState::Following) {
            let Some(position) = physics.body(record.body).map(Body::position) else {
                continue;
            };
            if distance(player_position, position) > strawberry.follow_distance {
                let eased = Vec2::new(
                    lerp(position.x, player_position.x, t),
                    lerp(position.y, player_position.y, t),
                );
                physics.set_position(record.body, eased);
            }
        }
    }

    /// Apply a state change picked by `next` and update collision to match
    fn transition(
        &mut self,
        entity: Entity,
        physics: &mut PhysicsWorld,
        next: impl FnOnce(&TileRecord) -> Option<TileState>,
    ) -> bool {
        let Some(record) = self.tiles.get_mut(&entity) else {
            return false;
        };
        let Some(state) = next(record) else {
            return false;
        };
        record.state = state;
        record.sync(physics);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;
    use approx::assert_relative_eq;

    struct Fixture {
        world: World,
        physics: PhysicsWorld,
        level: LevelManager,
    }

    fn fixture() -> Fixture {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut level = LevelManager::new(fixtures::level()).unwrap();
        level.reset(&mut world, &mut physics).unwrap();
        Fixture { world, physics, level }
    }

    fn find(level: &LevelManager, scene: u16, tileset_kind: TileKind) -> Entity {
        level
            .tiles()
            .find(|(_, record)| record.scene == scene && record.kind == tileset_kind)
            .map(|(entity, _)| entity)
            .unwrap()
    }

    fn collidable(f: &Fixture, entity: Entity) -> bool {
        let body = f.level.tile(entity).unwrap().body;
        f.physics.body(body).unwrap().is_collidable()
    }

    #[test]
    fn test_reset_loads_start_scene_and_neighbors() {
        let f = fixture();
        assert_eq!(f.level.loaded_scenes(), &[0, 1]);
        assert!(!f.level.is_scene_loaded(2));
        assert_eq!(f.physics.len(), f.level.tiles().count());
        assert!(f.level.tiles().all(|(_, record)| record.shown));
    }

    #[test]
    fn test_enter_scene_records_progress() {
        let mut f = fixture();
        assert!(f.level.can_enter_scene(1));
        assert!(f.level.enter_scene(1, &mut f.world, &mut f.physics).unwrap());
        assert!(f.level.is_entering_scene());
        assert_eq!(f.level.progress().scene, 1);
        assert_eq!(f.level.progress().previous_scene, 0);

        // Only one transition at a time
        assert!(!f.level.can_enter_scene(0));
        assert!(!f.level.enter_scene(0, &mut f.world, &mut f.physics).unwrap());

        f.level.finish_enter_scene();
        assert_eq!(f.level.current_scene(), 1);
        assert!(f.level.can_enter_scene(0));
        assert!(!f.level.can_enter_scene(1));
    }

    #[test]
    fn test_entering_hides_scenes_outside_the_neighborhood() {
        let mut f = fixture();
        f.level.show_scene(2, &mut f.world, &mut f.physics).unwrap();
        let far = find(&f.level, 2, TileKind::Solid);
        assert!(collidable(&f, far));

        f.level.enter_scene(1, &mut f.world, &mut f.physics).unwrap();
        assert!(!f.level.tile(far).unwrap().shown);
        assert!(!collidable(&f, far));

        f.level.show_scene(2, &mut f.world, &mut f.physics).unwrap();
        assert!(collidable(&f, far));
    }

    #[test]
    fn test_point_queries() {
        let f = fixture();
        assert_eq!(f.level.scene_at_point(Vec2::new(9.0, 1.0)), Some(1));
        assert_eq!(f.level.scene_at_point(Vec2::new(50.0, 1.0)), None);
        assert_eq!(f.level.scenes_around_point(Vec2::new(7.5, 1.0)), vec![0, 1]);
        assert_eq!(
            f.level.closest_tile_of_scene(fixtures::exit_position(), 1),
            Some(fixtures::exit_position() + Vec2::new(1.0, 0.0))
        );
        assert!(f.level.is_in_bounds(Vec2::new(-1.5, 1.0), 2.0));
        assert!(f.level.is_in_bounds(Vec2::new(15.0, 1.0), 2.0));
        assert!(!f.level.is_in_bounds(Vec2::new(3.0, -10.0), 2.0));
    }

    #[test]
    fn test_spawn_position_follows_previous_scene() {
        let mut f = fixture();
        let fallback = Vec2::new(20.0, 5.0);
        let start = f.level.spawn_position(fallback);
        assert_relative_eq!(start, fixtures::start_spawn() + Vec2::new(0.0, 0.1));

        f.level.enter_scene(1, &mut f.world, &mut f.physics).unwrap();
        let arrival = f.level.spawn_position(fallback);
        assert_relative_eq!(arrival, Vec2::new(8.0, 1.1));

        let mut progress = Progress::new(1);
        progress.previous_scene = 2;
        let level = LevelManager::with_progress(fixtures::level(), progress).unwrap();
        assert_eq!(level.spawn_position(fallback), fallback);
    }

    #[test]
    fn test_crystal_regrows() {
        let mut f = fixture();
        let crystal = find(&f.level, 0, TileKind::Crystal);
        let config = CrystalConfig::default();
        let crumbling = CrumblingPlatformConfig::default();

        assert!(f.level.collect_crystal(crystal, &mut f.physics));
        assert!(!f.level.collect_crystal(crystal, &mut f.physics));
        assert!(!collidable(&f, crystal));

        f.level.update_tiles(config.respawn_time * 0.5, &config, &crumbling, &mut f.physics);
        assert!(!collidable(&f, crystal));
        f.level.update_tiles(config.respawn_time, &config, &crumbling, &mut f.physics);
        assert_eq!(f.level.tile(crystal).unwrap().state, TileState::Active);
        assert!(collidable(&f, crystal));
        assert_eq!(f.level.kind_of(crystal), Some(TileKind::Crystal));
    }

    #[test]
    fn test_crumbling_platform_gives_way_then_returns() {
        let mut f = fixture();
        let platform = find(&f.level, 0, TileKind::CrumblingPlatform);
        let crystal = CrystalConfig::default();
        let config = CrumblingPlatformConfig::default();

        assert!(f.level.touch_crumbling(platform));
        f.level.update_tiles(config.crumble_time * 0.5, &crystal, &config, &mut f.physics);
        assert!(collidable(&f, platform));

        f.level.update_tiles(config.crumble_time, &crystal, &config, &mut f.physics);
        assert!(matches!(f.level.tile(platform).unwrap().state, TileState::Crumbled(_)));
        assert!(!collidable(&f, platform));

        f.level.update_tiles(config.respawn_time + 0.1, &crystal, &config, &mut f.physics);
        assert!(collidable(&f, platform));
    }

    #[test]
    fn test_leaving_a_touched_platform_crumbles_it() {
        let mut f = fixture();
        let platform = find(&f.level, 0, TileKind::CrumblingPlatform);
        assert!(!f.level.release_crumbling(platform, &mut f.physics));
        f.level.touch_crumbling(platform);
        assert!(f.level.release_crumbling(platform, &mut f.physics));
        assert!(!collidable(&f, platform));
    }

    #[test]
    fn test_strawberry_follows_and_banks() {
        let mut f = fixture();
        let berry = find(&f.level, 0, TileKind::Strawberry);
        let config = StrawberryConfig::default();

        assert!(f.level.carry_strawberry(berry, &mut f.physics));
        assert!(!collidable(&f, berry));

        let home = f.level.tile(berry).unwrap().home;
        let player = home + Vec2::new(-4.0, 0.0);
        f.level.follow_player(player, 1.0 / 60.0, &config, &mut f.physics);
        let body = f.level.tile(berry).unwrap().body;
        let moved = f.physics.body(body).unwrap().position();
        assert!(moved.x < home.x && moved.x > player.x);

        assert_eq!(f.level.bank_strawberries(), 1);
        assert!(f.level.progress().has_strawberry(0));
        assert_eq!(f.level.tile(berry).unwrap().state, TileState::Banked);
    }

    #[test]
    fn test_dropped_strawberry_goes_home() {
        let mut f = fixture();
        let berry = find(&f.level, 0, TileKind::Strawberry);
        f.level.carry_strawberry(berry, &mut f.physics);
        let home = f.level.tile(berry).unwrap().home;
        f.level
            .follow_player(home + Vec2::new(5.0, 0.0), 0.1, &StrawberryConfig::default(), &mut f.physics);

        f.level.drop_strawberries(&mut f.physics);
        let body = f.level.tile(berry).unwrap().body;
        assert_eq!(f.physics.body(body).unwrap().position(), home);
        assert!(collidable(&f, berry));
    }

    #[test]
    fn test_banked_strawberry_stays_collected_after_reload() {
        let mut f = fixture();
        let berry = find(&f.level, 0, TileKind::Strawberry);
        f.level.carry_strawberry(berry, &mut f.physics);
        f.level.bank_strawberries();

        f.level.reset(&mut f.world, &mut f.physics).unwrap();
        let berry = find(&f.level, 0, TileKind::Strawberry);
        assert_eq!(f.level.tile(berry).unwrap().state, TileState::Banked);
        assert!(!collidable(&f, berry));
    }

    #[test]
    fn test_destroy_scene_removes_bodies() {
        let mut f = fixture();
        let before = f.physics.len();
        let removed = f.level.destroy_scene(1, &mut f.world, &mut f.physics);
        assert!(removed > 0);
        assert_eq!(f.physics.len(), before - removed);
        assert!(!f.level.is_scene_loaded(1));
        assert!(f.physics.contacts_are_consistent());
    }

    #[test]
    fn test_unload_scene_is_deferred() {
        let mut f = fixture();
        let tiles_in_scene = f.level.tiles().filter(|(_, r)| r.scene == 1).count();
        f.level.unload_scene(1, &mut f.world);
        assert_eq!(f.level.tiles().filter(|(_, r)| r.scene == 1).count(), tiles_in_scene);

        for entity in f.world.flush_destroyed() {
            f.physics.destroy_bodies_of(entity);
            f.level.forget_tile(entity);
        }
        assert_eq!(f.level.tiles().filter(|(_, r)| r.scene == 1).count(), 0);
        assert!(!f.level.is_scene_loaded(1));
    }
}
