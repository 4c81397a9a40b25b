//! The projection capability and the trivial equirectangular projection.

use geo_common::{Bounds2d, GeoError, GeoResult};

use crate::math::{is_valid_geodetic, EARTH_CIRCUMFERENCE};

/// A bidirectional mapping between geodetic and projected coordinates.
///
/// Implementations are immutable after construction and safe to call from
/// any number of threads at once.
pub trait GeographicProjection: Send + Sync {
    /// Projected (x, y) to geodetic (lon, lat) in degrees.
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)>;

    /// Geodetic (lon, lat) in degrees to projected (x, y).
    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)>;

    /// Envelope of the projected space. The projection's y axis is reported
    /// on the z axis of the returned bounds.
    fn bounds(&self) -> Bounds2d;

    /// Length of one projected unit in meters.
    fn meters_per_unit(&self) -> f64;
}

impl<P: GeographicProjection + ?Sized> GeographicProjection for Box<P> {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        (**self).to_geodetic(x, y)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        (**self).from_geodetic(lon, lat)
    }

    fn bounds(&self) -> Bounds2d {
        (**self).bounds()
    }

    fn meters_per_unit(&self) -> f64 {
        (**self).meters_per_unit()
    }
}

impl<P: GeographicProjection + ?Sized> GeographicProjection for &P {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        (**self).to_geodetic(x, y)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        (**self).from_geodetic(lon, lat)
    }

    fn bounds(&self) -> Bounds2d {
        (**self).bounds()
    }

    fn meters_per_unit(&self) -> f64 {
        (**self).meters_per_unit()
    }
}

/// Reject coordinates outside `[-180, 180] × [-90, 90]`.
pub fn check_geodetic(lon: f64, lat: f64) -> GeoResult<()> {
    if is_valid_geodetic(lon, lat) {
        Ok(())
    } else {
        Err(GeoError::out_of_domain(lon, lat))
    }
}

/// Plate carrée: projected coordinates are longitude and latitude.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equirectangular;

impl GeographicProjection for Equirectangular {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        check_geodetic(x, y)?;
        Ok((x, y))
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        check_geodetic(lon, lat)?;
        Ok((lon, lat))
    }

    fn bounds(&self) -> Bounds2d {
        Bounds2d::new(-180.0, 180.0, -90.0, 90.0)
    }

    fn meters_per_unit(&self) -> f64 {
        EARTH_CIRCUMFERENCE / 360.0
    }
}
