//! Fixed-size tiles of the block grid.

use geo_common::Bounds2d;

/// Blocks along each edge of a tile.
pub const TILE_SIZE: usize = 16;

/// Position of a tile in the block grid, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub x: i32,
    pub z: i32,
}

impl TilePos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Tile containing the given block.
    pub fn containing(block_x: i64, block_z: i64) -> Self {
        let size = TILE_SIZE as i64;
        Self::new(
            block_x.div_euclid(size) as i32,
            block_z.div_euclid(size) as i32,
        )
    }

    /// Block x of the tile's first column.
    pub fn min_block_x(&self) -> i64 {
        i64::from(self.x) * TILE_SIZE as i64
    }

    /// Block z of the tile's first row.
    pub fn min_block_z(&self) -> i64 {
        i64::from(self.z) * TILE_SIZE as i64
    }

    /// Bounds covering the block centres sampled by this tile,
    /// `[base, base + 15]` on each axis.
    pub fn bounds(&self) -> Bounds2d {
        let x = self.min_block_x() as f64;
        let z = self.min_block_z() as f64;
        let span = (TILE_SIZE - 1) as f64;
        Bounds2d::new(x, x + span, z, z + span)
    }
}

/// Per-block values of one tile, stored row-major by z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRaster {
    pos: TilePos,
    cells: Vec<i32>,
}

impl TileRaster {
    pub fn new(pos: TilePos) -> Self {
        Self {
            pos,
            cells: vec![0; TILE_SIZE * TILE_SIZE],
        }
    }

    pub fn pos(&self) -> TilePos {
        self.pos
    }

    /// Value at local column `x`, row `z`.
    ///
    /// # Panics
    /// If either coordinate is outside `0..TILE_SIZE`.
    pub fn get(&self, x: usize, z: usize) -> i32 {
        self.cells[index(x, z)]
    }

    pub fn set(&mut self, x: usize, z: usize, value: i32) {
        self.cells[index(x, z)] = value;
    }

    pub fn cell_mut(&mut self, x: usize, z: usize) -> &mut i32 {
        &mut self.cells[index(x, z)]
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    /// Number of non-zero cells.
    pub fn count_nonzero(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }
}

fn index(x: usize, z: usize) -> usize {
    assert!(x < TILE_SIZE && z < TILE_SIZE, "cell ({}, {}) outside tile", x, z);
    z * TILE_SIZE + x
}
