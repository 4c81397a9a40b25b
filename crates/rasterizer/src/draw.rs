//! Drawing strategies: what happens to a cell an element covers.

use std::fmt;
use std::sync::Arc;

use crate::tile::TileRaster;

type DrawFn = dyn Fn(&mut TileRaster, usize, usize, i32) + Send + Sync;

/// A drawing strategy held as data.
///
/// Called with the raster, the local cell column and row, and the
/// element's weight.
#[derive(Clone)]
pub struct DrawFunction(Arc<DrawFn>);

impl DrawFunction {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut TileRaster, usize, usize, i32) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Overwrite the cell with a fixed value, ignoring the weight.
    pub fn fill(value: i32) -> Self {
        Self::new(move |raster, x, z, _| raster.set(x, z, value))
    }

    /// Add the weight to the cell.
    pub fn add_weight() -> Self {
        Self::new(|raster, x, z, weight| {
            let cell = raster.cell_mut(x, z);
            *cell = cell.saturating_add(weight);
        })
    }

    /// Keep the larger of the cell and the weight.
    pub fn max_weight() -> Self {
        Self::new(|raster, x, z, weight| {
            let cell = raster.cell_mut(x, z);
            *cell = (*cell).max(weight);
        })
    }

    #[inline]
    pub fn apply(&self, raster: &mut TileRaster, x: usize, z: usize, weight: i32) {
        (self.0)(raster, x, z, weight)
    }
}

impl fmt::Debug for DrawFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DrawFunction")
    }
}
