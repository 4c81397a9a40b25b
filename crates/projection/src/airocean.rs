//! Buckminster Fuller's Airocean (Dymaxion) projection.
//!
//! The sphere is split into the 20 faces of an icosahedron, each face is
//! mapped onto a planar equilateral triangle of edge `ARC`, and the
//! triangles are unfolded into a net that keeps the continents whole.
//!
//! The net is shared by the refined projections, which only swap the
//! per-triangle transform; see [`IcosahedralNet::project`].

use geo_common::{Bounds2d, GeoError, GeoResult};
use nalgebra::{Rotation3, Vector3};
use tracing::debug;

use crate::geographic::{check_geodetic, GeographicProjection};
use crate::math::{
    cartesian_to_geo, cartesian_to_spherical, geo_to_cartesian, rotate, ARC, DVE,
    EARTH_SURFACE_AREA, EL6, R, ROOT3, Z,
};

/// Number of real icosahedron faces.
pub const FACE_COUNT: usize = 20;

/// Iterations of the Newton solve in [`inverse_triangle_transform`].
const INVERSE_TRANSFORM_ITERATIONS: usize = 5;

/// Icosahedron vertices as (lon, lat) in degrees.
///
/// The orientation places every vertex in the ocean.
const VERTICES: [(f64, f64); 12] = [
    (10.536199, 64.700000),
    (-5.245390, 2.300882),
    (58.157706, 10.447378),
    (122.300000, 39.100000),
    (-143.478490, 50.103201),
    (-67.132330, 23.717925),
    (36.521510, -50.103200),
    (112.867673, -23.717930),
    (174.754610, -2.300882),
    (-121.842290, -10.447350),
    (-57.700000, -39.100000),
    (-169.463800, -64.700000),
];

/// Vertex indices of each face. The first vertex sets the face's in-plane
/// orientation.
const FACES: [[usize; 3]; FACE_COUNT] = [
    [2, 1, 6],
    [1, 0, 2],
    [0, 1, 5],
    [1, 5, 10],
    [1, 6, 10],
    [7, 2, 6],
    [2, 3, 7],
    [3, 0, 2],
    [0, 3, 4],
    [4, 0, 5],
    [5, 4, 9],
    [9, 5, 10],
    [10, 9, 11],
    [11, 6, 10],
    [6, 7, 11],
    [8, 3, 7],
    [8, 3, 4],
    [8, 4, 9],
    [9, 8, 11],
    [7, 8, 11],
];

/// Placement of each triangle's centre in the net, in units of
/// (ARC / 2, ARC·√3 / 12).
///
/// Ids 20 and 21 place the pieces of faces 14 and 15 that are cut off and
/// rotated by 60° so the net does not overlap itself.
const CENTER_MAP: [(f64, f64); FACE_COUNT + 2] = [
    (-3.0, 7.0),
    (-2.0, 5.0),
    (-1.0, 7.0),
    (2.0, 5.0),
    (4.0, 5.0),
    (-4.0, 1.0),
    (-3.0, -1.0),
    (-2.0, 1.0),
    (-1.0, -1.0),
    (0.0, 1.0),
    (1.0, -1.0),
    (2.0, 1.0),
    (3.0, -1.0),
    (4.0, 1.0),
    (5.0, -1.0),
    (-3.0, -5.0),
    (-1.0, -5.0),
    (1.0, -5.0),
    (2.0, -7.0),
    (-4.0, -7.0),
    (-5.0, -5.0),
    (-2.0, -7.0),
];

/// Faces that point down in the net and are therefore rotated by 180°.
const FLIP_TRIANGLE: [bool; FACE_COUNT] = [
    true, false, true, false, false, true, false, true, false, true, false, true, false, true,
    false, true, true, true, false, false,
];

/// Triangle id for each cell of the sheared 3 × 11 lookup grid; `-1` is
/// outside the net.
const FACE_ON_GRID: [i8; 33] = [
    -1, -1, 0, 1, 2, -1, -1, 3, -1, 4, -1, //
    -1, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, //
    20, 19, 15, 21, 16, -1, 17, 18, -1, -1, -1,
];

const GRID_COLUMNS: i64 = 11;

/// Sheared cell indices that can land inside the grid, with a margin.
const GRID_SPAN: std::ops::RangeInclusive<f64> = -4.0..=4.0;

/// Id of the placement holding the rotated piece of face 14.
const FACE_14_PIECE: usize = 20;
/// Id of the placement holding the rotated piece of face 15.
const FACE_15_PIECE: usize = 21;

/// sin and cos of 60°.
const SIN_60: f64 = 0.5 * ROOT3;
const COS_60: f64 = 0.5;

/// A face of the icosahedron, with the rotation taking it to the +z pole.
#[derive(Debug, Clone)]
struct Face {
    centroid: Vector3<f64>,
    rotation: Rotation3<f64>,
    inverse: Rotation3<f64>,
}

impl Face {
    fn new(vertices: &[Vector3<f64>; 12], ids: [usize; 3]) -> Self {
        let centroid =
            (vertices[ids[0]] + vertices[ids[1]] + vertices[ids[2]]).normalize();
        let (lon, colat) = cartesian_to_spherical([centroid.x, centroid.y, centroid.z]);

        let pre = Rotation3::from_axis_angle(&Vector3::y_axis(), -colat)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), -lon);

        // Spin the face about the pole so its first vertex points along +y.
        let first = pre * vertices[ids[0]];
        let spin = std::f64::consts::FRAC_PI_2 - first.y.atan2(first.x);
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), spin) * pre;

        Self {
            centroid,
            inverse: rotation.inverse(),
            rotation,
        }
    }
}

/// Gnomonic-style map from a point on the face at the +z pole to the
/// planar triangle centred on the origin.
pub fn triangle_transform(v: &Vector3<f64>) -> (f64, f64) {
    let s = Z / v.z;
    let xp = s * v.x;
    let yp = s * v.y;

    let a = ((2.0 * yp / ROOT3 - EL6) / DVE).atan();
    let b = ((xp - yp / ROOT3 - EL6) / DVE).atan();
    let c = ((-xp - yp / ROOT3 - EL6) / DVE).atan();

    (0.5 * (b - c), (2.0 * a - b - c) / (2.0 * ROOT3))
}

/// Inverse of [`triangle_transform`], solved with a fixed number of Newton
/// steps on the tangent of the third angle.
pub fn inverse_triangle_transform(x: f64, y: f64) -> Vector3<f64> {
    let tan_a_off = (ROOT3 * y + x).tan();
    let tan_b_off = (2.0 * x).tan();

    let a_num = tan_a_off * tan_a_off + 1.0;
    let b_num = tan_b_off * tan_b_off + 1.0;

    let mut tan_a = tan_a_off;
    let mut tan_b = tan_b_off;
    let mut tan_c = 0.0;

    let mut a_denom = 1.0;
    let mut b_denom = 1.0;

    for _ in 0..INVERSE_TRANSFORM_ITERATIONS {
        let f = tan_a + tan_b + tan_c - R;
        let f_prime = a_num * a_denom * a_denom + b_num * b_denom * b_denom + 1.0;

        tan_c -= f / f_prime;

        a_denom = 1.0 / (1.0 - tan_c * tan_a_off);
        b_denom = 1.0 / (1.0 - tan_c * tan_b_off);

        tan_a = (tan_c + tan_a_off) * a_denom;
        tan_b = (tan_c + tan_b_off) * b_denom;
    }

    let yp = ROOT3 * (DVE * tan_a + EL6) / 2.0;
    let xp = DVE * tan_b + yp / ROOT3 + EL6;

    let xp_over_z = xp / Z;
    let yp_over_z = yp / Z;

    let z = 1.0 / (1.0 + xp_over_z * xp_over_z + yp_over_z * yp_over_z).sqrt();
    Vector3::new(z * xp_over_z, z * yp_over_z, z)
}

/// The unfolded icosahedron: face geometry plus the 2D layout.
#[derive(Debug, Clone)]
pub struct IcosahedralNet {
    faces: Vec<Face>,
}

impl Default for IcosahedralNet {
    fn default() -> Self {
        Self::new()
    }
}

impl IcosahedralNet {
    pub fn new() -> Self {
        let vertices: [Vector3<f64>; 12] = VERTICES.map(|(lon, lat)| {
            let [x, y, z] = geo_to_cartesian(lon, lat);
            Vector3::new(x, y, z)
        });
        let faces = FACES.iter().map(|&ids| Face::new(&vertices, ids)).collect();
        Self { faces }
    }

    /// Face whose centroid is nearest to `v`.
    pub fn find_face(&self, v: &Vector3<f64>) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, face) in self.faces.iter().enumerate() {
            let dist = (face.centroid - v).norm_squared();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Layout placement containing the net point (x, y), if any.
    ///
    /// Returns a face id in `0..20` or one of the two rotated-piece ids.
    pub fn placement_at(&self, x: f64, y: f64) -> Option<usize> {
        let xp = x / ARC;
        let mut yp = y / (ARC * ROOT3);

        let row = if yp > -0.25 && yp < 0.25 {
            1
        } else if (0.25..=0.75).contains(&yp) {
            yp = 0.5 - yp;
            0
        } else if (-0.75..=-0.25).contains(&yp) {
            yp = -yp - 0.5;
            2
        } else {
            return None;
        };

        yp += 0.25;
        let gx = (xp - yp).floor();
        let gy = (xp + yp).floor();
        // Occupied cells have gx in [-3, 2]. Reject the rest, NaN included,
        // before the integer column arithmetic.
        if !(GRID_SPAN.contains(&gx) && GRID_SPAN.contains(&gy)) {
            return None;
        }

        let col = 2 * gx as i64 + i64::from(gy != gx) + 6;
        if !(0..GRID_COLUMNS).contains(&col) {
            return None;
        }

        let id = FACE_ON_GRID[(row * GRID_COLUMNS + col) as usize];
        usize::try_from(id).ok()
    }

    /// Map a geodetic coordinate into the net.
    ///
    /// `transform` maps a point on the face rotated to the +z pole into the
    /// face's local triangle frame.
    pub fn project<F>(&self, lon: f64, lat: f64, transform: F) -> GeoResult<(f64, f64)>
    where
        F: Fn(&Vector3<f64>) -> (f64, f64),
    {
        check_geodetic(lon, lat)?;

        let [vx, vy, vz] = geo_to_cartesian(lon, lat);
        let vector = Vector3::new(vx, vy, vz);

        let mut face = self.find_face(&vector);
        let (mut x, mut y) = transform(&(self.faces[face].rotation * vector));

        if FLIP_TRIANGLE[face] {
            x = -x;
            y = -y;
        }

        // Pieces of faces 14 and 15 are moved to their own placements.
        if ((face == 15 && x > y * ROOT3) || face == 14) && x > 0.0 {
            (x, y) = rotate(x, y, SIN_60, COS_60);
            face += 6;
        }

        let (cx, cy) = center(face);
        let out = (x + cx, y + cy);
        if out.0.is_finite() && out.1.is_finite() {
            Ok(out)
        } else {
            Err(GeoError::out_of_domain(lon, lat))
        }
    }

    /// Map a point of the net back to geodetic coordinates.
    ///
    /// `inverse` is the inverse of the `transform` given to [`Self::project`].
    pub fn unproject<F>(&self, x: f64, y: f64, inverse: F) -> GeoResult<(f64, f64)>
    where
        F: Fn(f64, f64) -> Vector3<f64>,
    {
        let out_of_domain = || GeoError::out_of_domain(x, y);

        let mut face = self.placement_at(x, y).ok_or_else(out_of_domain)?;
        let (cx, cy) = center(face);
        let mut lx = x - cx;
        let mut ly = y - cy;

        // Each half of a split face is only valid on its own side of the cut.
        let off_piece = match face {
            14 => lx > 0.0,
            FACE_14_PIECE => -ly * ROOT3 > lx,
            15 => lx > 0.0 && lx > ly * ROOT3,
            FACE_15_PIECE => lx < 0.0 || -ly * ROOT3 > lx,
            _ => false,
        };
        if off_piece {
            return Err(out_of_domain());
        }

        if face >= FACE_COUNT {
            (lx, ly) = rotate(lx, ly, -SIN_60, COS_60);
            face -= 6;
        }

        if FLIP_TRIANGLE[face] {
            lx = -lx;
            ly = -ly;
        }

        let v = self.faces[face].inverse * inverse(lx, ly);
        let (lon, lat) = cartesian_to_geo([v.x, v.y, v.z]);
        if lon.is_finite() && lat.is_finite() {
            Ok((lon, lat))
        } else {
            Err(out_of_domain())
        }
    }
}

fn center(id: usize) -> (f64, f64) {
    let (cx, cy) = CENTER_MAP[id];
    (cx * 0.5 * ARC, cy * ARC * ROOT3 / 12.0)
}

/// The unrefined Airocean projection.
///
/// Projected units are radians of arc along a triangle edge.
#[derive(Debug, Clone, Default)]
pub struct Airocean {
    net: IcosahedralNet,
}

impl Airocean {
    pub fn new() -> Self {
        debug!("Constructing Airocean projection");
        Self {
            net: IcosahedralNet::new(),
        }
    }

    pub fn net(&self) -> &IcosahedralNet {
        &self.net
    }
}

/// Envelope of the unfolded net.
pub fn net_bounds() -> Bounds2d {
    Bounds2d::new(
        -3.0 * ARC,
        2.5 * ARC,
        -0.75 * ARC * ROOT3,
        0.75 * ARC * ROOT3,
    )
}

impl GeographicProjection for Airocean {
    fn to_geodetic(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        self.net.unproject(x, y, inverse_triangle_transform)
    }

    fn from_geodetic(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        self.net.project(lon, lat, triangle_transform)
    }

    fn bounds(&self) -> Bounds2d {
        net_bounds()
    }

    /// Side of a square whose area is one of the 20 equal face areas.
    fn meters_per_unit(&self) -> f64 {
        (EARTH_SURFACE_AREA / (20.0 * ROOT3 * ARC * ARC / 4.0)).sqrt()
    }
}
