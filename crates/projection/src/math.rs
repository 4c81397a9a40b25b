//! Constants and spherical conversions shared by the icosahedral projections.

/// √3.
pub const ROOT3: f64 = 1.732_050_807_568_877_2;

/// Angular edge length of an icosahedron face, `2·asin(√((5 - √5) / 10))`
/// (equal to `atan 2`). One triangle edge spans `ARC` projected units.
pub const ARC: f64 = 1.107_148_717_794_090_4;

/// Distance from the sphere centre to the plane of a face, scaled to the
/// gnomonic frame of the triangle transform.
pub const Z: f64 = 0.794_654_472_291_766_1;

/// Edge length of the inscribed icosahedron on the unit sphere.
pub const EL: f64 = 1.051_462_224_238_267_2;

/// `EL / 6`.
pub const EL6: f64 = 0.175_243_704_039_711_2;

/// `√(3 + √5) / √(5 + √5)`.
pub const DVE: f64 = 0.850_650_808_352_039_8;

/// Newton target for the inverse triangle transform, `-3·EL6 / DVE`.
pub const R: f64 = -0.618_033_988_749_894_9;

/// Mean Earth circumference in meters.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_017.0;

/// Earth surface area in square meters.
pub const EARTH_SURFACE_AREA: f64 = 510_100_000_000_000.0;

pub const TO_RADIANS: f64 = std::f64::consts::PI / 180.0;
pub const TO_DEGREES: f64 = 180.0 / std::f64::consts::PI;

/// Unit vector for a geodetic coordinate in degrees.
///
/// Uses colatitude so the north pole is +z and longitude 0 lies in the
/// x-z plane.
pub fn geo_to_cartesian(lon: f64, lat: f64) -> [f64; 3] {
    let lambda = lon * TO_RADIANS;
    let phi = (90.0 - lat) * TO_RADIANS;
    let sin_phi = phi.sin();
    [sin_phi * lambda.cos(), sin_phi * lambda.sin(), phi.cos()]
}

/// Geodetic coordinate in degrees for a (not necessarily unit) vector.
pub fn cartesian_to_geo(v: [f64; 3]) -> (f64, f64) {
    let [x, y, z] = v;
    let lon = y.atan2(x) * TO_DEGREES;
    let colat = x.hypot(y).atan2(z);
    (lon, 90.0 - colat * TO_DEGREES)
}

/// Spherical (lon, colat) of a vector in radians.
pub fn cartesian_to_spherical(v: [f64; 3]) -> (f64, f64) {
    let [x, y, z] = v;
    (y.atan2(x), x.hypot(y).atan2(z))
}

/// Whether a geodetic coordinate lies in `[-180, 180] × [-90, 90]`.
///
/// NaN is rejected.
pub fn is_valid_geodetic(lon: f64, lat: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Rotate (x, y) counter-clockwise by the angle with the given sine and cosine.
#[inline]
pub fn rotate(x: f64, y: f64, sin: f64, cos: f64) -> (f64, f64) {
    (cos * x - sin * y, sin * x + cos * y)
}
