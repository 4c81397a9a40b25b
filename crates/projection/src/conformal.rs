//! Conformal refinement of the Airocean projection.
//!
//! The base triangle transform distorts angles. A precomputed vector field
//! maps each point of a conformal triangle to the base transform's output,
//! so the inverse direction is a plain interpolation and the forward
//! direction inverts the field with Newton's method.

use std::cell::Cell;
use std::io::Read;
use std::sync::Arc;

use geo_common::{Bounds2d, GeoResult};
use nalgebra::Vector3;
use tracing::{debug, info};

use crate::airocean::{
    inverse_triangle_transform, net_bounds, triangle_transform, IcosahedralNet,
};
use crate::geographic::GeographicProjection;
use crate::math::{ARC, EARTH_CIRCUMFERENCE, ROOT3};
use crate::source::FieldSource;
use crate::vector_field::TriangulatedVectorField;

/// Multiplier applied to every value read from the field table.
pub const VECTOR_SCALE_FACTOR: f64 = 1.0 / 1.147_397_973_019_293_4;

/// Lattice side of the published field table.
pub const FIELD_SIDE: usize = 256;

/// Newton steps per forward projection.
pub const NEWTON_ITERATIONS: usize = 5;

/// The Airocean projection made locally angle-preserving.
#[derive(Debug, Clone)]
pub struct ConformalAirocean {
    net: IcosahedralNet,
    field: Arc<TriangulatedVectorField>,
}

impl ConformalAirocean {
    pub fn new(field: TriangulatedVectorField) -> Self {
        Self::with_field(Arc::new(field))
    }

    /// Share an already loaded field.
    pub fn with_field(field: Arc<TriangulatedVectorField>) -> Self {
        debug!(side = field.side(), "Constructing conformal Airocean projection");
        Self {
            net: IcosahedralNet::new(),
            field,
        }
    }

    /// Load the standard field table.
    pub fn load(source: &FieldSource) -> GeoResult<Self> {
        Self::load_with_side(source, FIELD_SIDE)
    }

    /// Load a field table with a non-standard lattice side.
    pub fn load_with_side(source: &FieldSource, side: usize) -> GeoResult<Self> {
        let field = Self::read_field(source.open()?, side)?;
        info!(source = %source, side = side, "Loaded conformal vector field");
        Ok(Self::new(field))
    }

    pub fn from_reader<R: Read>(reader: R, side: usize) -> GeoResult<Self> {
        Ok(Self::new(Self::read_field(reader, side)?))
    }

    fn read_field<R: Read>(reader: R, side: usize) -> GeoResult<TriangulatedVectorField> {
        TriangulatedVectorField::from_reader(reader, side, VECTOR_SCALE_FACTOR)
    }

    pub fn field(&self) -> &Arc<TriangulatedVectorField> {
        &self.field
    }

    /// Solve for the conformal triangle point whose field value is the raw
    /// base point (x, y).
    fn solve(&self, x: f64, y: f64) -> (f64, f64) {
        self.field.newton_invert(
            x,
            y,
            x / ARC + 0.5,
            y / ARC + ROOT3 / 6.0,
            NEWTON_ITERATIONS,
        )
    }

    fn transform(&self, v: &Vector3<f64>) -> (f64, f64) {
        let (x, y) = triangle_transform(v);
        let (cx, cy) = self.solve(x, y);
        ((cx - 0.5) * ARC, (cy - ROOT3 / 6.0) * ARC)
    }

    fn inverse_transform(&self, x: f64, y: f64) -> Vector3<f64> {
        let raw = self
            .field
            .interpolate(x / ARC + 0.5, y / ARC + ROOT3 / 6.0);
        inverse_triangle_transform(raw.x, raw.y)
    }

    /// How far the Newton solve for (lon, lat) is from an exact inverse,
    /// in raw triangle units.
    ///
    /// Projection results are unaffected; this is a diagnostic for points
    /// near triangle edges where five iterations may fall short.
    pub fn forward_residual(&self, lon: f64, lat: f64) -> GeoResult<f64> {
        let residual = Cell::new(0.0);
        self.net.project(lon, lat, |v| {
            let (x, y) = triangle_transform(v);
            let (cx, cy) = self.solve(x, y);
            residual.set(self.field.residual(x, y, cx, cy));
            ((cx - 0.5) * ARC, (cy - ROOT3 / 6.0) * ARC)
        })?;
        Ok(residual.get())
    }
}

impl GeographicProjection for ConformalAirocean {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.net.unproject(x, y, |x, y| self.inverse_transform(x, y))
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        self.net.project(lon, lat, |v| self.transform(v))
    }

    fn bounds(&self) -> Bounds2d {
        net_bounds()
    }

    fn meters_per_unit(&self) -> f64 {
        EARTH_CIRCUMFERENCE / (2.0 * std::f64::consts::PI) / VECTOR_SCALE_FACTOR
    }
}
