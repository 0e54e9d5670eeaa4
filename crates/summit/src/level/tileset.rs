//! Tile definitions and level files

use super::tilemap::{Tilemap, TilemapTile};
use super::LevelError;
use platform_engine::config::{Config, ConfigError, Deserialize, Serialize};
use platform_engine::physics::BodyTemplate;

/// What a tile does when the player meets it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Plain terrain
    Solid,
    /// Terrain the player can jump up through
    Platform,
    /// Launches the player upward
    Spring,
    /// Kills on touch
    Spikes,
    /// Refills dash and stamina, then regrows
    Crystal,
    /// Carried until the next landing, then collected
    Strawberry,
    /// Leads to the scene named by the tile's orientation
    SceneExit,
    /// Gives way shortly after being stood on or climbed
    CrumblingPlatform,
}

/// A tile type with one body template per orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    /// Id used by tilemap cells; 0 is reserved for empty
    pub id: u16,
    /// Display name
    pub name: String,
    /// Behavior
    pub kind: TileKind,
    /// Body per orientation
    pub orientations: Vec<BodyTemplate>,
}

impl Tileset {
    /// Body template for a cell
    ///
    /// Scene exits use their orientation as a scene index, so they always
    /// take the first template.
    pub fn template(&self, orientation: u16) -> Option<&BodyTemplate> {
        match self.kind {
            TileKind::SceneExit => self.orientations.first(),
            _ => self.orientations.get(orientation as usize),
        }
    }
}

/// Tilesets and scenes making up a level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// Every tileset the scenes refer to
    pub tilesets: Vec<Tileset>,
    /// Scenes by index
    pub scenes: Vec<Tilemap>,
    /// Scene a fresh game starts in
    pub start_scene: u16,
}

impl Config for LevelData {}

impl LevelData {
    /// Tileset by id
    pub fn tileset(&self, id: u16) -> Option<&Tileset> {
        self.tilesets.iter().find(|t| t.id == id)
    }

    /// Scene by index
    pub fn scene(&self, index: u16) -> Option<&Tilemap> {
        self.scenes.get(index as usize)
    }

    /// Tileset and template for a cell
    pub fn resolve(&self, tile: TilemapTile) -> Result<(&Tileset, &BodyTemplate), LevelError> {
        let tileset = self.tileset(tile.tileset).ok_or(LevelError::UnknownTileset(tile.tileset))?;
        let template = tileset.template(tile.orientation).ok_or(LevelError::UnknownOrientation {
            tileset: tile.tileset,
            orientation: tile.orientation,
        })?;
        Ok((tileset, template))
    }

    /// Check that every reference in the level resolves
    pub fn validate(&self) -> Result<(), LevelError> {
        self.scene(self.start_scene).ok_or(LevelError::UnknownScene(self.start_scene))?;

        for (index, scene) in self.scenes.iter().enumerate() {
            if !scene.is_well_formed() {
                return Err(ConfigError::invalid(
                    format!("scenes[{}].tiles", index),
                    format!("expected {} rows of {} tiles", scene.rows, scene.columns),
                )
                .into());
            }
            for &neighbor in &scene.neighbors {
                self.scene(neighbor).ok_or(LevelError::UnknownScene(neighbor))?;
            }
            for (_, _, tile) in scene.occupied() {
                let (tileset, _) = self.resolve(tile)?;
                if tileset.kind == TileKind::SceneExit {
                    self.scene(tile.orientation).ok_or(LevelError::UnknownScene(tile.orientation))?;
                }
            }
        }
        Ok(())
    }

    /// Load and validate a level file
    pub fn load_validated(path: impl AsRef<std::path::Path>) -> Result<Self, LevelError> {
        let data = Self::load_from_file(path)?;
        data.validate()?;
        Ok(data)
    }
}
