//! A small three-scene level
//!
//! Scene 0 (x 0..8) holds a crumbling platform, a crystal, a strawberry and
//! an exit into scene 1. Scene 1 (x 8..16) holds a spring and spikes. Scene 2
//! is a lone rock far off to the right with no neighbors.

use crate::level::{LevelData, TileKind, Tilemap, TilemapTile, Tileset};
use platform_engine::foundation::math::Vec2;
use platform_engine::physics::{BodyTemplate, ColliderTemplate};

pub(crate) const ROCK: u16 = 1;
pub(crate) const EXIT: u16 = 2;
pub(crate) const CRYSTAL: u16 = 3;
pub(crate) const STRAWBERRY: u16 = 4;
pub(crate) const CRUMBLING: u16 = 5;
pub(crate) const SPRING: u16 = 6;
pub(crate) const SPIKES: u16 = 7;

fn block() -> ColliderTemplate {
    ColliderTemplate::solid(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0))
}

fn tileset(id: u16, name: &str, kind: TileKind, collider: ColliderTemplate) -> Tileset {
    Tileset {
        id,
        name: name.to_string(),
        kind,
        orientations: vec![BodyTemplate::fixed(vec![collider])],
    }
}

pub(crate) fn exit_position() -> Vec2 {
    Vec2::new(7.0, 1.0)
}

pub(crate) fn start_spawn() -> Vec2 {
    Vec2::new(1.0, 1.0)
}

pub(crate) fn level() -> LevelData {
    let mut first = Tilemap::new((0, 0), 4, 8);
    for col in 0..8 {
        first.set_tile(0, col, TilemapTile::new(ROCK, 0));
    }
    first.set_tile(1, 7, TilemapTile::new(EXIT, 1));
    first.set_tile(1, 5, TilemapTile::new(STRAWBERRY, 0));
    first.set_tile(3, 3, TilemapTile::new(CRYSTAL, 0));
    first.set_tile(3, 1, TilemapTile::new(CRUMBLING, 0));
    first.add_spawnpoint(1, 1, 0);
    first.neighbors = vec![1];

    let mut second = Tilemap::new((8, 0), 4, 8);
    for col in 0..8 {
        second.set_tile(0, col, TilemapTile::new(ROCK, 0));
    }
    second.set_tile(1, 4, TilemapTile::new(SPRING, 0));
    second.set_tile(1, 7, TilemapTile::new(SPIKES, 0));
    second.add_spawnpoint(1, 0, 0);
    second.neighbors = vec![0];

    let mut far = Tilemap::new((100, 0), 1, 1);
    far.set_tile(0, 0, TilemapTile::new(ROCK, 0));

    LevelData {
        tilesets: vec![
            tileset(ROCK, "rock", TileKind::Solid, block()),
            tileset(EXIT, "exit", TileKind::SceneExit, block().as_trigger()),
            tileset(CRYSTAL, "crystal", TileKind::Crystal, block().as_trigger()),
            tileset(STRAWBERRY, "strawberry", TileKind::Strawberry, block().as_trigger()),
            tileset(CRUMBLING, "crumbling", TileKind::CrumblingPlatform, block()),
            tileset(SPRING, "spring", TileKind::Spring, block().as_trigger()),
            tileset(SPIKES, "spikes", TileKind::Spikes, block().as_trigger()),
        ],
        scenes: vec![first, second, far],
        start_scene: 0,
    }
}

#[test]
fn test_fixture_level_is_valid() {
    assert!(level().validate().is_ok());
}
