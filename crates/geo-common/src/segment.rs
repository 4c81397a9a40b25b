//! Line segments in the projected plane.

use crate::bounds::{Bounded, Bounds2d};
use crate::geometry::{LineString, Polygon};

/// A straight segment from (x0, z0) to (x1, z1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f64,
    pub z0: f64,
    pub x1: f64,
    pub z1: f64,
}

impl Segment {
    pub fn new(x0: f64, z0: f64, x1: f64, z1: f64) -> Self {
        Self { x0, z0, x1, z1 }
    }

    pub fn length_squared(&self) -> f64 {
        let dx = self.x1 - self.x0;
        let dz = self.z1 - self.z0;
        dx * dx + dz * dz
    }

    /// Parameter `r` in [0, 1] of the point on this segment closest to
    /// (px, pz).
    ///
    /// `r = clamp(dot(P - A, B - A) / |B - A|², 0, 1)`. A zero-length
    /// segment has every parameter at the same point; 0 is returned.
    pub fn closest_parameter(&self, px: f64, pz: f64) -> f64 {
        let len_sq = self.length_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        let dx = self.x1 - self.x0;
        let dz = self.z1 - self.z0;
        (((px - self.x0) * dx + (pz - self.z0) * dz) / len_sq).clamp(0.0, 1.0)
    }

    /// Point on the segment at parameter `r`.
    pub fn point_at(&self, r: f64) -> (f64, f64) {
        (
            self.x0 + (self.x1 - self.x0) * r,
            self.z0 + (self.z1 - self.z0) * r,
        )
    }

    /// Closest point on the segment to (px, pz), endpoints included.
    pub fn closest_point(&self, px: f64, pz: f64) -> (f64, f64) {
        self.point_at(self.closest_parameter(px, pz))
    }

    /// Squared distance from (px, pz) to the nearest point of the segment.
    pub fn distance_squared(&self, px: f64, pz: f64) -> f64 {
        let (cx, cz) = self.closest_point(px, pz);
        let dx = px - cx;
        let dz = pz - cz;
        dx * dx + dz * dz
    }

    /// Whether (px, pz) lies within `radius` of the segment.
    pub fn within(&self, px: f64, pz: f64, radius: f64) -> bool {
        self.distance_squared(px, pz) <= radius * radius
    }

    /// The z coordinate where this segment crosses the vertical line at `x`.
    ///
    /// Uses a half-open x interval so a vertex shared by two edges is counted
    /// once; vertical segments never cross.
    pub fn crossing_at(&self, x: f64) -> Option<f64> {
        let (lo, hi) = if self.x0 <= self.x1 {
            (self.x0, self.x1)
        } else {
            (self.x1, self.x0)
        };
        if !(lo <= x && x < hi) {
            return None;
        }
        let t = (x - self.x0) / (self.x1 - self.x0);
        Some(self.z0 + (self.z1 - self.z0) * t)
    }
}

impl Bounded for Segment {
    fn bounds(&self) -> Bounds2d {
        Bounds2d::from_corners(self.x0, self.z0, self.x1, self.z1)
    }
}

/// Append one segment per consecutive pair of points in `line`.
///
/// A line of N points yields N - 1 segments. The point's `y` becomes the
/// segment's `z`.
pub fn convert_to_segments(line: &LineString, out: &mut Vec<Segment>) {
    out.reserve(line.len().saturating_sub(1));
    out.extend(
        line.points()
            .windows(2)
            .map(|w| Segment::new(w[0].x, w[0].y, w[1].x, w[1].y)),
    );
}

/// Every boundary edge of a polygon, holes included.
pub fn polygon_edges(polygon: &Polygon) -> Vec<Segment> {
    let mut edges = Vec::new();
    for ring in polygon.rings() {
        convert_to_segments(ring, &mut edges);
    }
    edges
}
