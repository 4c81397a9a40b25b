//! Axis-aligned 2D bounds and the bounds-provider capability.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in the projected plane.
///
/// The second axis is named `z` because the plane is the horizontal plane of
/// the block grid the vector data is rasterized onto. Projections report
/// their y axis here as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2d {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds2d {
    /// Create bounds from already-ordered extents.
    pub fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        debug_assert!(min_x <= max_x && min_z <= max_z, "unordered bounds");
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Bounds enclosing two corner points given in any order.
    pub fn from_corners(x0: f64, z0: f64, x1: f64, z1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            max_x: x0.max(x1),
            min_z: z0.min(z1),
            max_z: z0.max(z1),
        }
    }

    /// Degenerate bounds covering a single point.
    pub fn point(x: f64, z: f64) -> Self {
        Self::new(x, x, z, z)
    }

    /// Width of the box along x.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box along z.
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Inclusive overlap test on both axes.
    ///
    /// Boxes that only touch along an edge or corner intersect.
    pub fn intersects(&self, other: &Bounds2d) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    /// Compute the intersection of two boxes.
    pub fn intersection(&self, other: &Bounds2d) -> Option<Bounds2d> {
        if !self.intersects(other) {
            return None;
        }

        Some(Bounds2d {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_z: self.min_z.max(other.min_z),
            max_z: self.max_z.min(other.max_z),
        })
    }

    /// Smallest box containing both inputs.
    pub fn union(&self, other: &Bounds2d) -> Bounds2d {
        Bounds2d {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Grow the box by `radius` on every side.
    pub fn expand(&self, radius: f64) -> Bounds2d {
        Bounds2d {
            min_x: self.min_x - radius,
            max_x: self.max_x + radius,
            min_z: self.min_z - radius,
            max_z: self.max_z + radius,
        }
    }

    /// Check if a point is contained within this box (edges included).
    pub fn contains_point(&self, x: f64, z: f64) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    /// Check if `other` lies entirely inside this box.
    pub fn contains(&self, other: &Bounds2d) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_z >= self.min_z
            && other.max_z <= self.max_z
    }

    /// Union of the bounds of every item, or `None` for an empty input.
    pub fn enclosing<'a, I, T>(items: I) -> Option<Bounds2d>
    where
        I: IntoIterator<Item = &'a T>,
        T: Bounded + 'a,
    {
        items
            .into_iter()
            .map(Bounded::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Anything that can report the axis-aligned box enclosing it.
pub trait Bounded {
    fn bounds(&self) -> Bounds2d;
}

impl Bounded for Bounds2d {
    fn bounds(&self) -> Bounds2d {
        *self
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn bounds(&self) -> Bounds2d {
        (**self).bounds()
    }
}

impl<T: Bounded + ?Sized> Bounded for Box<T> {
    fn bounds(&self) -> Bounds2d {
        (**self).bounds()
    }
}
