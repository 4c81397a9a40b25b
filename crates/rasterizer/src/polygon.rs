//! Even-odd scanline fill.

use geo_common::{Bounds2d, Segment};
use spatial_index::Bvh;

use crate::draw::DrawFunction;
use crate::tile::{TileRaster, TILE_SIZE};

/// Sorted z values where the edges cross the vertical line at `x`.
///
/// Crossings pair up under the even-odd rule: cells between the first and
/// second are inside, between the second and third outside, and so on.
/// Holes are just more edges in the same set.
pub fn scanline_crossings(edges: &Bvh<Segment>, x: f64) -> Vec<f64> {
    let mut crossings = Vec::new();
    collect_crossings(edges, x, &mut crossings);
    crossings
}

fn collect_crossings(edges: &Bvh<Segment>, x: f64, out: &mut Vec<f64>) {
    out.clear();
    let Some(extent) = edges.bounds() else {
        return;
    };
    let column = Bounds2d::new(x, x, extent.min_z, extent.max_z);
    edges.for_each_intersecting(&column, |edge| {
        if let Some(z) = edge.crossing_at(x) {
            out.push(z);
        }
    });
    out.sort_unstable_by(f64::total_cmp);
}

/// Fill the cells of the tile that lie inside the polygon.
///
/// A cell at block (x, z) is inside when `z0 <= z < z1` for some crossing
/// pair at `x`, so polygons sharing an edge never both claim a cell.
pub fn fill_polygon(
    edges: &Bvh<Segment>,
    raster: &mut TileRaster,
    draw: &DrawFunction,
    weight: i32,
) {
    let pos = raster.pos();
    let base_x = pos.min_block_x();
    let base_z = pos.min_block_z();
    let last_z = base_z + TILE_SIZE as i64 - 1;

    let mut crossings = Vec::new();
    for lx in 0..TILE_SIZE {
        collect_crossings(edges, (base_x + lx as i64) as f64, &mut crossings);
        for pair in crossings.chunks_exact(2) {
            let start = (pair[0].ceil() as i64).max(base_z);
            let end = (pair[1].ceil() as i64 - 1).min(last_z);
            for z in start..=end {
                draw.apply(raster, lx, (z - base_z) as usize, weight);
            }
        }
    }
}
