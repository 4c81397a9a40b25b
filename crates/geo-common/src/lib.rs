//! Common types shared across the airocean tile crates.
//!
//! Geometry primitives, the bounds-provider capability used by the spatial
//! index, and the error taxonomy every crate reports through.

pub mod bounds;
pub mod error;
pub mod geometry;
pub mod segment;

pub use bounds::{Bounded, Bounds2d};
pub use error::{GeoError, GeoResult};
pub use geometry::{
    Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon, RawGeometry,
};
pub use segment::{convert_to_segments, polygon_edges, Segment};
