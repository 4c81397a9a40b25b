//! Test data generators.
//!
//! Random generators take a seed so failures reproduce. Field generators
//! produce conformal table text in the on-disk layout: one row per `v`, each
//! row listing `[x, y]` pairs for `u = 0..=n - v`.

use geo_common::{Bounds2d, Segment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROOT3: f64 = 1.732_050_807_568_877_2;

/// A deterministic RNG for reproducible tests.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random segments with endpoints in `[-extent, extent]²` and lengths up to
/// `max_len` on each axis.
pub fn random_segments(rng: &mut StdRng, count: usize, extent: f64, max_len: f64) -> Vec<Segment> {
    (0..count)
        .map(|_| {
            let x0 = rng.gen_range(-extent..=extent);
            let z0 = rng.gen_range(-extent..=extent);
            let x1 = x0 + rng.gen_range(-max_len..=max_len);
            let z1 = z0 + rng.gen_range(-max_len..=max_len);
            Segment::new(x0, z0, x1, z1)
        })
        .collect()
}

/// Random query boxes inside `[-extent, extent]²` with sides up to `max_size`.
///
/// Roughly one box in eight is degenerate (a single point) to exercise
/// inclusive edge handling.
pub fn random_bounds(rng: &mut StdRng, count: usize, extent: f64, max_size: f64) -> Vec<Bounds2d> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(-extent..=extent);
            let z = rng.gen_range(-extent..=extent);
            if rng.gen_ratio(1, 8) {
                return Bounds2d::point(x, z);
            }
            let w = rng.gen_range(0.0..=max_size);
            let h = rng.gen_range(0.0..=max_size);
            Bounds2d::new(x, x + w, z, z + h)
        })
        .collect()
}

/// Random (lon, lat) pairs strictly inside the geodetic domain.
pub fn random_geodetic(rng: &mut StdRng, count: usize) -> Vec<(f64, f64)> {
    (0..count)
        .map(|_| (rng.gen_range(-179.9..179.9), rng.gen_range(-89.9..89.9)))
        .collect()
}

/// Conformal table text for a triangular grid of side `n`.
///
/// `value(nx, ny)` receives the normalized lattice position (the unit
/// triangle with corners (0,0), (1,0), (0.5, √3/2)) and returns the raw
/// projected point it should map to. Values are divided by `scale` so that
/// a loader multiplying by `scale` recovers them.
pub fn field_text_from_fn<F>(n: usize, scale: f64, value: F) -> String
where
    F: Fn(f64, f64) -> (f64, f64),
{
    let side = n as f64;
    let mut text = String::new();
    for v in 0..=n {
        let row: Vec<String> = (0..=n - v)
            .map(|u| {
                let nx = (u as f64 + 0.5 * v as f64) / side;
                let ny = 0.5 * ROOT3 * v as f64 / side;
                let (x, y) = value(nx, ny);
                format!("[{:?}, {:?}]", x / scale, y / scale)
            })
            .collect();
        text.push_str(&row.join(", "));
        text.push_str(",\n");
    }
    text
}

/// A field that reproduces the unrefined projection exactly.
///
/// `arc` is the triangle edge length in projected units.
pub fn identity_field_text(n: usize, arc: f64, scale: f64) -> String {
    field_text_from_fn(n, scale, |nx, ny| {
        ((nx - 0.5) * arc, (ny - ROOT3 / 6.0) * arc)
    })
}

/// A smooth warp that leaves the triangle boundary fixed.
///
/// The displacement is scaled by the product of the barycentric coordinates,
/// so it vanishes on every edge and the refined net stays seamless.
pub fn bubble_field_text(n: usize, arc: f64, scale: f64, strength: f64) -> String {
    field_text_from_fn(n, scale, |nx, ny| {
        let l3 = 2.0 * ny / ROOT3;
        let l2 = nx - 0.5 * l3;
        let l1 = 1.0 - l2 - l3;
        let bubble = l1 * l2 * l3;
        (
            (nx - 0.5 + strength * bubble * (l2 - l1)) * arc,
            (ny - ROOT3 / 6.0 + strength * bubble * (l3 - l1)) * arc,
        )
    })
}
