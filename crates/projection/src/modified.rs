//! The Airocean net rearranged around the Bering Strait.
//!
//! Eurasia is cut from the Americas along a polyline through the Bering
//! Strait and the Aleutians, rotated 150° clockwise and attached so that
//! North America and Asia meet. The whole net is then turned a quarter turn
//! so north points up.

use geo_common::{Bounds2d, GeoError, GeoResult};

use crate::conformal::ConformalAirocean;
use crate::geographic::GeographicProjection;
use crate::math::{rotate, ARC, ROOT3};

/// Rotation applied to the Eurasian part of the net.
const THETA: f64 = -150.0 * std::f64::consts::PI / 180.0;

const BERING_X: f64 = -0.342_042_096_011_833_9;
const BERING_Y: f64 = -0.322_211_064_085_279;

const ARCTIC_Y: f64 = -0.2;

const ALEUTIAN_Y: f64 = -0.500_044_680_549_252_6;
const ALEUTIAN_XL: f64 = -0.514_923_127_975_750_7;
const ALEUTIAN_XR: f64 = -0.45;

/// The cut line between the Americas and Eurasia, in net coordinates of
/// the wrapped projection.
#[derive(Debug, Clone, Copy)]
struct Seam {
    arctic_m: f64,
    arctic_b: f64,
    aleutian_m: f64,
    aleutian_b: f64,
}

impl Seam {
    fn new() -> Self {
        let arctic_m = (ARCTIC_Y - ROOT3 * ARC / 4.0) / (BERING_X + 0.5 * ARC);
        let aleutian_m = (BERING_Y - ALEUTIAN_Y) / (BERING_X - ALEUTIAN_XR);
        Self {
            arctic_m,
            arctic_b: ARCTIC_Y - arctic_m * BERING_X,
            aleutian_m,
            aleutian_b: BERING_Y - aleutian_m * BERING_X,
        }
    }

    /// Whether a point of the unmodified net lies on the Eurasian side.
    fn is_eurasian(&self, x: f64, y: f64) -> bool {
        if x > 0.0 {
            return false;
        }
        if x < -0.5 * ARC {
            return true;
        }

        if y > ROOT3 * ARC / 4.0 {
            return x < 0.0;
        }

        if y < ALEUTIAN_Y {
            return y < (ALEUTIAN_Y + ALEUTIAN_XL) - x;
        }

        if y > BERING_Y {
            if y < ARCTIC_Y {
                return x < BERING_X;
            }
            return y < self.arctic_m * x + self.arctic_b;
        }

        y > self.aleutian_m * x + self.aleutian_b
    }
}

/// An Airocean projection in the Bering-Strait orientation.
///
/// Generic over the wrapped flavour; the standard world map wraps
/// [`ConformalAirocean`].
#[derive(Debug, Clone)]
pub struct ModifiedAirocean<P = ConformalAirocean> {
    inner: P,
    seam: Seam,
    sin_theta: f64,
    cos_theta: f64,
}

impl<P: GeographicProjection> ModifiedAirocean<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            seam: Seam::new(),
            sin_theta: THETA.sin(),
            cos_theta: THETA.cos(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: GeographicProjection> GeographicProjection for ModifiedAirocean<P> {
    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        let (mut x, mut y) = self.inner.from_geodetic(lon, lat)?;
        let eurasian = self.seam.is_eurasian(x, y);

        y -= 0.75 * ARC * ROOT3;

        if eurasian {
            x += ARC;

            (x, y) = rotate(x, y, self.sin_theta, self.cos_theta);
        } else {
            x -= ARC;
        }

        Ok((y, -x))
    }

    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        let eurasian = if y < 0.0 {
            x > 0.0
        } else if y > ARC / 2.0 {
            x > -ROOT3 * ARC / 2.0
        } else {
            -ROOT3 * y < x
        };

        let (mut nx, mut ny) = (-y, x);

        if eurasian {
            (nx, ny) = rotate(nx, ny, -self.sin_theta, self.cos_theta);
            nx -= ARC;
        } else {
            nx += ARC;
        }

        ny += 0.75 * ARC * ROOT3;

        // The point must land on the same side of the seam it came from.
        if eurasian != self.seam.is_eurasian(nx, ny) {
            return Err(GeoError::out_of_domain(x, y));
        }

        self.inner.to_geodetic(nx, ny)
    }

    fn bounds(&self) -> Bounds2d {
        Bounds2d::new(-1.5 * ARC * ROOT3, 3.0 * ARC, -1.5 * ARC, ARC * ROOT3)
    }

    fn meters_per_unit(&self) -> f64 {
        self.inner.meters_per_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airocean::Airocean;

    #[test]
    fn test_seam_sides() {
        let seam = Seam::new();
        assert!(!seam.is_eurasian(0.5, 0.0));
        assert!(seam.is_eurasian(-1.0, 0.0));
        assert!(seam.is_eurasian(-0.1, 0.5));
        // Just east and west of the strait
        assert!(seam.is_eurasian(BERING_X - 0.01, -0.25));
        assert!(!seam.is_eurasian(BERING_X + 0.01, -0.25));
    }

    #[test]
    fn test_roundtrip_over_base_net() {
        let p = ModifiedAirocean::new(Airocean::new());
        for &(lon, lat) in &[(2.35, 48.86), (-74.0, 40.7), (116.4, 39.9), (-150.0, 61.2), (151.2, -33.9)] {
            let (x, y) = p.from_geodetic(lon, lat).unwrap();
            let (lon2, lat2) = p.to_geodetic(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-6, "{} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-6, "{} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_meters_per_unit_delegates() {
        let inner = Airocean::new();
        let expected = inner.meters_per_unit();
        assert_eq!(ModifiedAirocean::new(inner).meters_per_unit(), expected);
    }
}
