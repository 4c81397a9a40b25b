//! Common test fixtures.
//!
//! Pre-defined coordinates and polygons reused across the projection and
//! rasterizer suites.

/// Published control points for the standard world pipeline (conformal
/// net in BTE orientation, flipped and scaled to meters).
pub mod control_points {
    /// A geodetic coordinate and its projected image.
    #[derive(Debug, Clone, Copy)]
    pub struct ControlPoint {
        pub name: &'static str,
        pub lon: f64,
        pub lat: f64,
        pub x: f64,
        pub y: f64,
    }

    pub const PARIS: ControlPoint = ControlPoint {
        name: "Paris",
        lon: 2.350987,
        lat: 48.856667,
        x: 2851660.278582057,
        y: -5049718.243628887,
    };

    /// Maximum allowed error, in projected units.
    pub const TOLERANCE: f64 = 0.1;

    pub const ALL: &[ControlPoint] = &[PARIS];
}

/// Geodetic sample locations spread across many icosahedron faces.
pub mod cities {
    pub const NEW_YORK: (f64, f64) = (-74.0060, 40.7128);
    pub const LONDON: (f64, f64) = (-0.1278, 51.5074);
    pub const BEIJING: (f64, f64) = (116.4074, 39.9042);
    pub const SEATTLE: (f64, f64) = (-122.3321, 47.6062);
    pub const SYDNEY: (f64, f64) = (151.2093, -33.8688);
    pub const CAPE_TOWN: (f64, f64) = (18.4241, -33.9249);
    pub const SANTIAGO: (f64, f64) = (-70.6693, -33.4489);
    pub const ANCHORAGE: (f64, f64) = (-149.9003, 61.2181);
    pub const MCMURDO: (f64, f64) = (166.6863, -77.8419);

    pub const ALL: &[(f64, f64)] = &[
        NEW_YORK, LONDON, BEIJING, SEATTLE, SYDNEY, CAPE_TOWN, SANTIAGO, ANCHORAGE, MCMURDO,
    ];
}

/// Raw coordinate rings for polygon tests.
pub mod polygons {
    /// Closed square ring from (min, min) to (max, max).
    pub fn square_ring(min: f64, max: f64) -> Vec<[f64; 2]> {
        vec![[min, min], [min, max], [max, max], [max, min], [min, min]]
    }

    /// The 10×10 square with corners (0,0) and (10,10).
    pub fn unit_square() -> Vec<Vec<[f64; 2]>> {
        vec![square_ring(0.0, 10.0)]
    }

    /// The 10×10 square with a hole from (3,3) to (7,7).
    pub fn square_with_hole() -> Vec<Vec<[f64; 2]>> {
        vec![square_ring(0.0, 10.0), square_ring(3.0, 7.0)]
    }

    /// Three points, first equals last: closed but too short for a ring.
    pub fn degenerate_ring() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [5.0, 0.0], [0.0, 0.0]]
    }
}
