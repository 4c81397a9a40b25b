//! Validated vector geometry model.
//!
//! Every type here upholds its invariant from construction: a `LineString`
//! always has at least two points, every coordinate is finite and every ring of a `Polygon` is a closed
//! linear ring. Raw coordinate arrays go through the factory functions on
//! [`Geometry`], which either return a complete value or
//! [`GeoError::InvalidGeometry`].

use crate::bounds::{Bounded, Bounds2d};
use crate::error::{GeoError, GeoResult};

/// A position in either geodetic (lon, lat) or projected (x, y) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from(c: [f64; 2]) -> Self {
        Point::new(c[0], c[1])
    }
}

impl Bounded for Point {
    fn bounds(&self) -> Bounds2d {
        Bounds2d::point(self.x, self.y)
    }
}

/// An ordered polyline of two or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    /// Minimum number of points in a closed linear ring.
    pub const MIN_RING_POINTS: usize = 4;

    pub fn new(points: Vec<Point>) -> GeoResult<Self> {
        if points.len() < 2 {
            return Err(GeoError::InvalidGeometry(format!(
                "line string needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeoError::InvalidGeometry(format!(
                "line string point {} is not finite: ({}, {})",
                i, points[i].x, points[i].y
            )));
        }
        Ok(Self { points })
    }

    /// Construct a line string that must also be a linear ring.
    pub fn ring(points: Vec<Point>) -> GeoResult<Self> {
        let line = Self::new(points)?;
        if !line.is_ring() {
            return Err(GeoError::InvalidGeometry(format!(
                "ring must be closed with at least {} points (got {} points, closed: {})",
                Self::MIN_RING_POINTS,
                line.points.len(),
                line.is_closed()
            )));
        }
        Ok(line)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed line string.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point equals last point.
    pub fn is_closed(&self) -> bool {
        self.points.first() == self.points.last()
    }

    /// A closed line string of at least four points.
    pub fn is_ring(&self) -> bool {
        self.points.len() >= Self::MIN_RING_POINTS && self.is_closed()
    }

    fn try_map<E>(&self, f: &mut impl FnMut(Point) -> Result<Point, E>) -> Result<Self, E> {
        let points = self
            .points
            .iter()
            .map(|p| f(*p))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self { points })
    }
}

impl Bounded for LineString {
    fn bounds(&self) -> Bounds2d {
        let first = self.points[0];
        self.points[1..]
            .iter()
            .fold(first.bounds(), |acc, p| acc.union(&p.bounds()))
    }
}

/// A polygon with one outer ring and any number of holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    outer: LineString,
    inner: Vec<LineString>,
}

impl Polygon {
    pub fn new(outer: LineString, inner: Vec<LineString>) -> GeoResult<Self> {
        if !outer.is_ring() {
            return Err(GeoError::InvalidGeometry(
                "polygon outer ring is not a linear ring".to_string(),
            ));
        }
        if let Some(i) = inner.iter().position(|ring| !ring.is_ring()) {
            return Err(GeoError::InvalidGeometry(format!(
                "polygon inner ring {} is not a linear ring",
                i
            )));
        }
        Ok(Self { outer, inner })
    }

    pub fn outer(&self) -> &LineString {
        &self.outer
    }

    pub fn inner(&self) -> &[LineString] {
        &self.inner
    }

    /// Outer ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.outer).chain(self.inner.iter())
    }

    fn try_map<E>(&self, f: &mut impl FnMut(Point) -> Result<Point, E>) -> Result<Self, E> {
        // A pure point mapping sends equal endpoints to equal endpoints, so
        // rings stay closed and no revalidation is needed.
        Ok(Self {
            outer: self.outer.try_map(f)?,
            inner: self
                .inner
                .iter()
                .map(|ring| ring.try_map(f))
                .collect::<Result<Vec<_>, E>>()?,
        })
    }
}

impl Bounded for Polygon {
    // Holes lie inside the outer ring.
    fn bounds(&self) -> Bounds2d {
        self.outer.bounds()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineString(pub Vec<LineString>);

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon(pub Vec<Polygon>);

/// Raw coordinate arrays as they arrive from a feature source, before
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
    GeometryCollection(Vec<RawGeometry>),
}

/// A validated geometry of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    GeometryCollection(Vec<Geometry>),
}

fn to_points(coords: Vec<[f64; 2]>) -> Vec<Point> {
    coords.into_iter().map(Point::from).collect()
}

impl Geometry {
    pub fn point(coord: [f64; 2]) -> GeoResult<Self> {
        let point = Point::from(coord);
        if !point.is_finite() {
            return Err(GeoError::InvalidGeometry(format!(
                "point is not finite: ({}, {})",
                point.x, point.y
            )));
        }
        Ok(Geometry::Point(point))
    }

    pub fn line_string(coords: Vec<[f64; 2]>) -> GeoResult<Self> {
        Ok(Geometry::LineString(LineString::new(to_points(coords))?))
    }

    pub fn multi_line_string(lines: Vec<Vec<[f64; 2]>>) -> GeoResult<Self> {
        let lines = lines
            .into_iter()
            .map(|coords| LineString::new(to_points(coords)))
            .collect::<GeoResult<Vec<_>>>()?;
        Ok(Geometry::MultiLineString(MultiLineString(lines)))
    }

    /// First ring is the outer boundary, the rest are holes.
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> GeoResult<Self> {
        Ok(Geometry::Polygon(polygon_from_rings(rings)?))
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> GeoResult<Self> {
        let polygons = polygons
            .into_iter()
            .map(polygon_from_rings)
            .collect::<GeoResult<Vec<_>>>()?;
        Ok(Geometry::MultiPolygon(MultiPolygon(polygons)))
    }

    /// Validate a raw geometry, rejecting it as a whole if any part is
    /// malformed.
    pub fn from_raw(raw: RawGeometry) -> GeoResult<Self> {
        match raw {
            RawGeometry::Point(c) => Self::point(c),
            RawGeometry::LineString(coords) => Self::line_string(coords),
            RawGeometry::MultiLineString(lines) => Self::multi_line_string(lines),
            RawGeometry::Polygon(rings) => Self::polygon(rings),
            RawGeometry::MultiPolygon(polygons) => Self::multi_polygon(polygons),
            RawGeometry::GeometryCollection(parts) => Ok(Geometry::GeometryCollection(
                parts
                    .into_iter()
                    .map(Self::from_raw)
                    .collect::<GeoResult<Vec<_>>>()?,
            )),
        }
    }

    /// Map every point through a fallible function, e.g. a projection.
    ///
    /// Fails on the first point the function rejects.
    pub fn try_map_points<E>(
        &self,
        mut f: impl FnMut(Point) -> Result<Point, E>,
    ) -> Result<Geometry, E> {
        self.try_map_inner(&mut f)
    }

    fn try_map_inner<E>(
        &self,
        f: &mut impl FnMut(Point) -> Result<Point, E>,
    ) -> Result<Geometry, E> {
        Ok(match self {
            Geometry::Point(p) => Geometry::Point(f(*p)?),
            Geometry::LineString(line) => Geometry::LineString(line.try_map(f)?),
            Geometry::MultiLineString(MultiLineString(lines)) => {
                Geometry::MultiLineString(MultiLineString(
                    lines
                        .iter()
                        .map(|l| l.try_map(f))
                        .collect::<Result<Vec<_>, E>>()?,
                ))
            }
            Geometry::Polygon(polygon) => Geometry::Polygon(polygon.try_map(f)?),
            Geometry::MultiPolygon(MultiPolygon(polygons)) => {
                Geometry::MultiPolygon(MultiPolygon(
                    polygons
                        .iter()
                        .map(|p| p.try_map(f))
                        .collect::<Result<Vec<_>, E>>()?,
                ))
            }
            Geometry::GeometryCollection(parts) => Geometry::GeometryCollection(
                parts
                    .iter()
                    .map(|g| g.try_map_inner(f))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
        })
    }

    /// Every line string in this geometry, descending into collections.
    pub fn line_strings(&self) -> Vec<&LineString> {
        let mut out = Vec::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines<'a>(&'a self, out: &mut Vec<&'a LineString>) {
        match self {
            Geometry::LineString(line) => out.push(line),
            Geometry::MultiLineString(MultiLineString(lines)) => out.extend(lines.iter()),
            Geometry::GeometryCollection(parts) => {
                parts.iter().for_each(|g| g.collect_lines(out));
            }
            _ => {}
        }
    }

    /// Every polygon in this geometry, descending into collections.
    pub fn polygons(&self) -> Vec<&Polygon> {
        let mut out = Vec::new();
        self.collect_polygons(&mut out);
        out
    }

    fn collect_polygons<'a>(&'a self, out: &mut Vec<&'a Polygon>) {
        match self {
            Geometry::Polygon(polygon) => out.push(polygon),
            Geometry::MultiPolygon(MultiPolygon(polygons)) => out.extend(polygons.iter()),
            Geometry::GeometryCollection(parts) => {
                parts.iter().for_each(|g| g.collect_polygons(out));
            }
            _ => {}
        }
    }

    /// Bounds of the whole geometry; `None` only for geometry that contains
    /// no points (empty multi-geometries and collections).
    pub fn bounds(&self) -> Option<Bounds2d> {
        match self {
            Geometry::Point(p) => Some(p.bounds()),
            Geometry::LineString(line) => Some(line.bounds()),
            Geometry::MultiLineString(MultiLineString(lines)) => Bounds2d::enclosing(lines),
            Geometry::Polygon(polygon) => Some(polygon.bounds()),
            Geometry::MultiPolygon(MultiPolygon(polygons)) => Bounds2d::enclosing(polygons),
            Geometry::GeometryCollection(parts) => parts
                .iter()
                .filter_map(Geometry::bounds)
                .reduce(|acc, b| acc.union(&b)),
        }
    }
}

fn polygon_from_rings(rings: Vec<Vec<[f64; 2]>>) -> GeoResult<Polygon> {
    let mut rings = rings.into_iter();
    let outer = rings
        .next()
        .ok_or_else(|| GeoError::InvalidGeometry("polygon has no rings".to_string()))?;
    let outer = LineString::ring(to_points(outer))?;
    let inner = rings
        .map(|ring| LineString::ring(to_points(ring)))
        .collect::<GeoResult<Vec<_>>>()?;
    Polygon::new(outer, inner)
}
