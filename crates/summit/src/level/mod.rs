//! Levels: scene grids, tile definitions and the live set of tile bodies

pub mod manager;
pub mod progress;
pub mod tilemap;
pub mod tileset;

pub use manager::{LevelManager, TileRecord, TileState};
pub use progress::Progress;
pub use tilemap::{Spawnpoint, Tilemap, TilemapTile};
pub use tileset::{LevelData, TileKind, Tileset};

use platform_engine::config::ConfigError;

/// Level loading and lookup errors
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    /// A cell names a tileset that does not exist
    #[error("Unknown tileset {0}")]
    UnknownTileset(u16),

    /// A cell names an orientation its tileset does not have
    #[error("Tileset {tileset} has no orientation {orientation}")]
    UnknownOrientation {
        /// Tileset id
        tileset: u16,
        /// Requested orientation
        orientation: u16,
    },

    /// A scene index that does not exist
    #[error("Unknown scene {0}")]
    UnknownScene(u16),

    /// Level file could not be read
    #[error("Level config error: {0}")]
    Config(#[from] ConfigError),
}
