//! Rasterizable vector elements.
//!
//! An element pairs a shape, chosen by variant, with a drawing strategy
//! held as data. Rasterization dispatches on the shape and hands every
//! covered cell to the strategy.

use geo_common::{Bounded, Bounds2d, GeoError, GeoResult, Segment};
use spatial_index::Bvh;

use crate::draw::DrawFunction;
use crate::line::draw_wide_line;
use crate::polygon::fill_polygon;
use crate::tile::TileRaster;

#[derive(Debug)]
pub enum Shape {
    /// Cells within `radius` of any segment.
    WideLine { segments: Bvh<Segment>, radius: f64 },
    /// Cells inside the edges under the even-odd rule.
    FillPolygon { edges: Bvh<Segment> },
}

impl Shape {
    /// Area the shape can draw into, `None` when it has no segments.
    pub fn bounds(&self) -> Option<Bounds2d> {
        match self {
            Shape::WideLine { segments, radius } => segments.bounds().map(|b| b.expand(*radius)),
            Shape::FillPolygon { edges } => edges.bounds(),
        }
    }
}

#[derive(Debug)]
pub struct VectorElement {
    pub id: String,
    /// Lower layers are drawn first.
    pub layer: i32,
    pub shape: Shape,
    pub draw: DrawFunction,
    pub weight: i32,
    bounds: Bounds2d,
}

impl VectorElement {
    pub fn new(
        id: impl Into<String>,
        layer: i32,
        shape: Shape,
        draw: DrawFunction,
        weight: i32,
    ) -> GeoResult<Self> {
        let id = id.into();
        let bounds = shape
            .bounds()
            .ok_or_else(|| GeoError::InvalidGeometry(format!("element {} has no segments", id)))?;
        Ok(Self {
            id,
            layer,
            shape,
            draw,
            weight,
            bounds,
        })
    }

    pub fn rasterize(&self, raster: &mut TileRaster) {
        match &self.shape {
            Shape::WideLine { segments, radius } => {
                draw_wide_line(segments, *radius, raster, &self.draw, self.weight)
            }
            Shape::FillPolygon { edges } => fill_polygon(edges, raster, &self.draw, self.weight),
        }
    }
}

impl Bounded for VectorElement {
    fn bounds(&self) -> Bounds2d {
        self.bounds
    }
}
