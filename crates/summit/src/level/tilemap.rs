//! Scene grids
//!
//! A scene is a grid of tiles anchored at an integer world origin. Row 0 is
//! the bottom row; tile (row, col) sits at `origin + (col, row)`.

use platform_engine::config::{Deserialize, Serialize};
use platform_engine::foundation::math::Vec2;

/// One grid cell: which tileset and which orientation of it
///
/// Tileset 0 is the empty tile. For scene exits the orientation is the index
/// of the scene the exit leads to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u16, u16)", into = "(u16, u16)")]
pub struct TilemapTile {
    /// Tileset id, 0 for empty
    pub tileset: u16,
    /// Orientation within the tileset
    pub orientation: u16,
}

impl TilemapTile {
    /// The empty tile
    pub const EMPTY: Self = Self {
        tileset: 0,
        orientation: 0,
    };

    /// Create a tile
    pub fn new(tileset: u16, orientation: u16) -> Self {
        Self { tileset, orientation }
    }

    /// Is this cell empty?
    pub fn is_empty(&self) -> bool {
        self.tileset == 0
    }
}

impl From<(u16, u16)> for TilemapTile {
    fn from((tileset, orientation): (u16, u16)) -> Self {
        Self { tileset, orientation }
    }
}

impl From<TilemapTile> for (u16, u16) {
    fn from(tile: TilemapTile) -> Self {
        (tile.tileset, tile.orientation)
    }
}

/// Where the player appears when arriving from another scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawnpoint {
    /// World position of the player's feet
    pub position: (f32, f32),
    /// The scene the player came from
    pub from_scene: u16,
}

impl Spawnpoint {
    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position.0, self.position.1)
    }
}

/// A scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tilemap {
    /// World position of tile (0, 0)
    pub origin: (i32, i32),
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub columns: u32,
    /// Scenes kept loaded and shown while this one is current
    pub neighbors: Vec<u16>,
    /// `tiles[row][col]`
    pub tiles: Vec<Vec<TilemapTile>>,
    /// Spawnpoints keyed by the scene the player arrives from
    pub spawnpoints: Vec<Spawnpoint>,
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new((0, 0), 0, 0)
    }
}

impl Tilemap {
    /// Create an empty scene
    pub fn new(origin: (i32, i32), rows: u32, columns: u32) -> Self {
        Self {
            origin,
            rows,
            columns,
            neighbors: Vec::new(),
            tiles: vec![vec![TilemapTile::EMPTY; columns as usize]; rows as usize],
            spawnpoints: Vec::new(),
        }
    }

    /// Origin as a vector
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.origin.0 as f32, self.origin.1 as f32)
    }

    /// Lowest-left tile position
    pub fn min_corner(&self) -> Vec2 {
        self.origin()
    }

    /// Highest-right tile position
    pub fn max_corner(&self) -> Vec2 {
        self.origin() + Vec2::new(self.columns as f32 - 1.0, self.rows as f32 - 1.0)
    }

    /// Does the grid match its declared size?
    pub fn is_well_formed(&self) -> bool {
        self.tiles.len() == self.rows as usize && self.tiles.iter().all(|row| row.len() == self.columns as usize)
    }

    /// Tile at a grid position
    pub fn tile(&self, row: u32, col: u32) -> Option<TilemapTile> {
        self.tiles.get(row as usize)?.get(col as usize).copied()
    }

    /// Tile under a world position
    pub fn tile_at(&self, point: Vec2) -> Option<TilemapTile> {
        let local = point - self.origin();
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        self.tile(local.y as u32, local.x as u32)
    }

    /// Replace a tile. Returns false when outside the grid.
    pub fn set_tile(&mut self, row: u32, col: u32, tile: TilemapTile) -> bool {
        match self.tiles.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            Some(cell) => {
                *cell = tile;
                true
            }
            None => false,
        }
    }

    /// World position of a grid cell
    pub fn world_position(&self, row: u32, col: u32) -> Vec2 {
        self.origin() + Vec2::new(col as f32, row as f32)
    }

    /// Every non-empty cell with its grid position
    pub fn occupied(&self) -> impl Iterator<Item = (u32, u32, TilemapTile)> + '_ {
        self.tiles.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, tile)| !tile.is_empty())
                .map(move |(col, &tile)| (row as u32, col as u32, tile))
        })
    }

    /// Add a spawnpoint at a grid cell
    pub fn add_spawnpoint(&mut self, row: u32, col: u32, from_scene: u16) {
        let position = self.world_position(row, col);
        self.spawnpoints.push(Spawnpoint {
            position: (position.x, position.y),
            from_scene,
        });
    }

    /// Drop every spawnpoint for arrivals from `from_scene`
    pub fn remove_spawnpoint(&mut self, from_scene: u16) {
        self.spawnpoints.retain(|s| s.from_scene != from_scene);
    }

    /// Spawnpoint for arrivals from `previous_scene`
    pub fn spawnpoint_from(&self, previous_scene: u16) -> Option<&Spawnpoint> {
        self.spawnpoints.iter().find(|s| s.from_scene == previous_scene)
    }

    /// Is the point within the grid's footprint?
    pub fn is_point_inside(&self, point: Vec2) -> bool {
        self.is_point_in_range(0.0, point)
    }

    /// Is the point within the footprint grown by `range` on every side?
    pub fn is_point_in_range(&self, range: f32, point: Vec2) -> bool {
        let local = point - self.origin();
        let (columns, rows) = (self.columns as f32, self.rows as f32);
        local.x >= -range && local.x < columns + range && local.y >= -range && local.y < rows + range
    }
}
