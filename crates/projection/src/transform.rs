//! Affine wrappers around another projection.
//!
//! Each wrapper applies its change after the delegate's forward projection
//! and undoes it before the delegate's inverse.

use geo_common::{Bounds2d, GeoError, GeoResult};

use crate::geographic::GeographicProjection;

/// Multiplies projected coordinates by per-axis factors.
#[derive(Debug, Clone)]
pub struct Scaled<P> {
    delegate: P,
    x: f64,
    y: f64,
}

impl<P: GeographicProjection> Scaled<P> {
    /// Factors must be finite and non-zero.
    pub fn new(delegate: P, x: f64, y: f64) -> GeoResult<Self> {
        for (axis, factor) in [("x", x), ("y", y)] {
            if !factor.is_finite() || factor == 0.0 {
                return Err(GeoError::InvalidConfig(format!(
                    "scale factor {} must be finite and non-zero, got {}",
                    axis, factor
                )));
            }
        }
        Ok(Self { delegate, x, y })
    }

    /// Scale both axes by the same factor.
    pub fn uniform(delegate: P, factor: f64) -> GeoResult<Self> {
        Self::new(delegate, factor, factor)
    }
}

impl<P: GeographicProjection> GeographicProjection for Scaled<P> {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.delegate.to_geodetic(x / self.x, y / self.y)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let (x, y) = self.delegate.from_geodetic(lon, lat)?;
        Ok((x * self.x, y * self.y))
    }

    fn bounds(&self) -> Bounds2d {
        let b = self.delegate.bounds();
        Bounds2d::from_corners(
            b.min_x * self.x,
            b.min_z * self.y,
            b.max_x * self.x,
            b.max_z * self.y,
        )
    }

    fn meters_per_unit(&self) -> f64 {
        self.delegate.meters_per_unit() / ((self.x * self.x + self.y * self.y) / 2.0).sqrt()
    }
}

/// Translates projected coordinates.
#[derive(Debug, Clone)]
pub struct Offset<P> {
    delegate: P,
    dx: f64,
    dy: f64,
}

impl<P: GeographicProjection> Offset<P> {
    pub fn new(delegate: P, dx: f64, dy: f64) -> Self {
        Self { delegate, dx, dy }
    }
}

impl<P: GeographicProjection> GeographicProjection for Offset<P> {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.delegate.to_geodetic(x - self.dx, y - self.dy)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let (x, y) = self.delegate.from_geodetic(lon, lat)?;
        Ok((x + self.dx, y + self.dy))
    }

    fn bounds(&self) -> Bounds2d {
        let b = self.delegate.bounds();
        Bounds2d::new(
            b.min_x + self.dx,
            b.max_x + self.dx,
            b.min_z + self.dy,
            b.max_z + self.dy,
        )
    }

    fn meters_per_unit(&self) -> f64 {
        self.delegate.meters_per_unit()
    }
}

/// Negates the projected y axis, e.g. to turn a north-up map into the
/// south-positive block grid.
#[derive(Debug, Clone)]
pub struct FlipVertical<P> {
    delegate: P,
}

impl<P: GeographicProjection> FlipVertical<P> {
    pub fn new(delegate: P) -> Self {
        Self { delegate }
    }
}

impl<P: GeographicProjection> GeographicProjection for FlipVertical<P> {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.delegate.to_geodetic(x, -y)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let (x, y) = self.delegate.from_geodetic(lon, lat)?;
        Ok((x, -y))
    }

    fn bounds(&self) -> Bounds2d {
        let b = self.delegate.bounds();
        Bounds2d::new(b.min_x, b.max_x, -b.max_z, -b.min_z)
    }

    fn meters_per_unit(&self) -> f64 {
        self.delegate.meters_per_unit()
    }
}

/// Exchanges the projected x and y axes.
#[derive(Debug, Clone)]
pub struct SwapAxes<P> {
    delegate: P,
}

impl<P: GeographicProjection> SwapAxes<P> {
    pub fn new(delegate: P) -> Self {
        Self { delegate }
    }
}

impl<P: GeographicProjection> GeographicProjection for SwapAxes<P> {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.delegate.to_geodetic(y, x)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let (x, y) = self.delegate.from_geodetic(lon, lat)?;
        Ok((y, x))
    }

    fn bounds(&self) -> Bounds2d {
        let b = self.delegate.bounds();
        Bounds2d::new(b.min_z, b.max_z, b.min_x, b.max_x)
    }

    fn meters_per_unit(&self) -> f64 {
        self.delegate.meters_per_unit()
    }
}
