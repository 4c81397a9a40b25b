//! Per-tile rasterization over an indexed element set.

use std::time::Instant;

use geo_common::{Bounded, Bounds2d};
use rayon::prelude::*;
use spatial_index::Bvh;
use tracing::debug;

use crate::element::VectorElement;
use crate::tile::{TilePos, TileRaster};

/// An element with its position in the input, which breaks ties between
/// elements on the same layer.
#[derive(Debug)]
struct Ranked {
    order: usize,
    element: VectorElement,
}

impl Bounded for Ranked {
    fn bounds(&self) -> Bounds2d {
        self.element.bounds()
    }
}

/// Renders tiles from a fixed set of elements.
///
/// Immutable once built and shareable across threads; rebuild it when the
/// elements change.
#[derive(Debug)]
pub struct TileRasterizer {
    elements: Bvh<Ranked>,
}

impl TileRasterizer {
    pub fn new(elements: Vec<VectorElement>) -> Self {
        let ranked = elements
            .into_iter()
            .enumerate()
            .map(|(order, element)| Ranked { order, element })
            .collect();
        Self {
            elements: Bvh::build(ranked),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Area any element can draw into.
    pub fn bounds(&self) -> Option<Bounds2d> {
        self.elements.bounds()
    }

    /// Render one tile, drawing intersecting elements by ascending layer
    /// and then input order.
    pub fn rasterize(&self, pos: TilePos) -> TileRaster {
        let mut raster = TileRaster::new(pos);
        let mut hits = self.elements.query(&pos.bounds());
        hits.sort_unstable_by_key(|r| (r.element.layer, r.order));
        for ranked in hits {
            ranked.element.rasterize(&mut raster);
        }
        raster
    }

    /// Render tiles in parallel. The output order matches `tiles`.
    pub fn rasterize_all(&self, tiles: &[TilePos]) -> Vec<TileRaster> {
        let start = Instant::now();
        let rasters: Vec<TileRaster> = tiles.par_iter().map(|&pos| self.rasterize(pos)).collect();

        let drawn = rasters.iter().filter(|r| r.count_nonzero() > 0).count();
        debug!(
            tiles = rasters.len(),
            drawn,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rasterized tiles"
        );
        rasters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawFunction;
    use crate::element::Shape;
    use geo_common::Segment;

    fn square(id: &str, min: f64, max: f64, layer: i32, draw: DrawFunction) -> VectorElement {
        let edges = Bvh::build(vec![
            Segment::new(min, min, min, max),
            Segment::new(min, max, max, max),
            Segment::new(max, max, max, min),
            Segment::new(max, min, min, min),
        ]);
        VectorElement::new(id, layer, Shape::FillPolygon { edges }, draw, 0).unwrap()
    }

    #[test]
    fn test_layer_order_beats_input_order() {
        let rasterizer = TileRasterizer::new(vec![
            square("top", 0.0, 8.0, 2, DrawFunction::fill(2)),
            square("bottom", 0.0, 8.0, 1, DrawFunction::fill(1)),
        ]);
        let raster = rasterizer.rasterize(TilePos::new(0, 0));
        assert_eq!(raster.get(4, 4), 2);
    }

    #[test]
    fn test_input_order_within_layer() {
        let rasterizer = TileRasterizer::new(vec![
            square("a", 0.0, 8.0, 0, DrawFunction::fill(1)),
            square("b", 4.0, 12.0, 0, DrawFunction::fill(2)),
        ]);
        let raster = rasterizer.rasterize(TilePos::new(0, 0));
        assert_eq!(raster.get(2, 2), 1);
        assert_eq!(raster.get(5, 5), 2);
        assert_eq!(raster.get(10, 10), 2);
    }

    #[test]
    fn test_empty_rasterizer() {
        let rasterizer = TileRasterizer::new(Vec::new());
        assert!(rasterizer.is_empty());
        assert!(rasterizer.bounds().is_none());
        assert_eq!(rasterizer.rasterize(TilePos::new(3, -2)).count_nonzero(), 0);
    }
}
