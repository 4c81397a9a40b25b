//! Width-buffered line drawing.

use geo_common::Segment;
use spatial_index::Bvh;

use crate::draw::DrawFunction;
use crate::tile::{TileRaster, TILE_SIZE};

/// Draw every cell whose block centre lies within `radius` of any segment.
///
/// Each covered cell is drawn exactly once, however many segments reach it.
pub fn draw_wide_line(
    segments: &Bvh<Segment>,
    radius: f64,
    raster: &mut TileRaster,
    draw: &DrawFunction,
    weight: i32,
) {
    let pos = raster.pos();
    let candidates = segments.query(&pos.bounds().expand(radius));
    if candidates.is_empty() {
        return;
    }

    let base_x = pos.min_block_x() as f64;
    let base_z = pos.min_block_z() as f64;
    for lz in 0..TILE_SIZE {
        let z = base_z + lz as f64;
        for lx in 0..TILE_SIZE {
            let x = base_x + lx as f64;
            if candidates.iter().any(|s| s.within(x, z, radius)) {
                draw.apply(raster, lx, lz, weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TilePos;

    fn line(segments: Vec<Segment>) -> Bvh<Segment> {
        Bvh::build(segments)
    }

    #[test]
    fn test_horizontal_line() {
        let segments = line(vec![Segment::new(2.0, 8.0, 12.0, 8.0)]);
        let mut raster = TileRaster::new(TilePos::new(0, 0));
        draw_wide_line(&segments, 1.0, &mut raster, &DrawFunction::fill(1), 0);

        for z in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                let dx = if x < 2 { 2.0 - x as f64 } else if x > 12 { x as f64 - 12.0 } else { 0.0 };
                let dz = z as f64 - 8.0;
                let expected = i32::from(dx * dx + dz * dz <= 1.0);
                assert_eq!(raster.get(x, z), expected, "cell ({}, {})", x, z);
            }
        }
    }

    #[test]
    fn test_overlapping_segments_draw_once() {
        let segments = line(vec![
            Segment::new(0.0, 0.0, 15.0, 0.0),
            Segment::new(15.0, 0.0, 0.0, 0.0),
            Segment::new(5.0, -3.0, 5.0, 3.0),
        ]);
        let mut raster = TileRaster::new(TilePos::new(0, 0));
        draw_wide_line(&segments, 0.5, &mut raster, &DrawFunction::add_weight(), 1);
        assert!(raster.cells().iter().all(|&v| v <= 1));
        assert_eq!(raster.get(5, 0), 1);
        assert_eq!(raster.get(5, 3), 1);
        assert_eq!(raster.get(5, 4), 0);
    }

    #[test]
    fn test_segment_in_neighbour_tile_reaches_edge() {
        // Segment just left of the tile, close enough to touch column 0
        let segments = line(vec![Segment::new(-2.0, 0.0, -2.0, 15.0)]);
        let mut raster = TileRaster::new(TilePos::new(0, 0));
        draw_wide_line(&segments, 2.0, &mut raster, &DrawFunction::fill(3), 0);
        for z in 0..TILE_SIZE {
            assert_eq!(raster.get(0, z), 3);
            assert_eq!(raster.get(1, z), 0);
        }
    }

    #[test]
    fn test_point_as_degenerate_segment() {
        let segments = line(vec![Segment::new(20.0, 20.0, 20.0, 20.0)]);
        let mut raster = TileRaster::new(TilePos::new(1, 1));
        draw_wide_line(&segments, 2.0, &mut raster, &DrawFunction::fill(1), 0);
        // Cells within 2 of local (4, 4): a 3x3 block plus four arm tips
        assert_eq!(raster.count_nonzero(), 9 + 4);
    }
}
