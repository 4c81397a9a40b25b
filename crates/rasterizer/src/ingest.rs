//! Turning geodetic features into projected, rasterizable elements.

use geo_common::{
    convert_to_segments, polygon_edges, GeoError, GeoResult, Geometry, MultiLineString,
    MultiPolygon, Point, RawGeometry, Segment,
};
use projection::GeographicProjection;
use spatial_index::Bvh;
use tracing::{debug, warn};

use crate::draw::DrawFunction;
use crate::element::{Shape, VectorElement};

#[derive(Debug, Clone, Copy, PartialEq)]
enum StyleKind {
    Line { radius: f64 },
    Fill,
}

/// How a feature is drawn.
#[derive(Debug, Clone)]
pub struct ElementStyle {
    kind: StyleKind,
    layer: i32,
    draw: DrawFunction,
    weight: i32,
}

impl ElementStyle {
    /// Draw the feature's lines, polygon outlines and points buffered by
    /// `radius` blocks.
    pub fn line(layer: i32, radius: f64, draw: DrawFunction, weight: i32) -> GeoResult<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(GeoError::InvalidConfig(format!(
                "line radius must be finite and non-negative, got {}",
                radius
            )));
        }
        Ok(Self {
            kind: StyleKind::Line { radius },
            layer,
            draw,
            weight,
        })
    }

    /// Fill the feature's polygons. Features without polygons are rejected.
    pub fn fill(layer: i32, draw: DrawFunction, weight: i32) -> Self {
        Self {
            kind: StyleKind::Fill,
            layer,
            draw,
            weight,
        }
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }
}

/// A geodetic feature as it arrives from a data source.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: String,
    pub geometry: RawGeometry,
    pub style: ElementStyle,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: RawGeometry, style: ElementStyle) -> Self {
        Self {
            id: id.into(),
            geometry,
            style,
        }
    }
}

/// Validate, project and segmentize one feature.
pub fn build_element<P>(feature: &Feature, projection: &P) -> GeoResult<VectorElement>
where
    P: GeographicProjection + ?Sized,
{
    let geometry = Geometry::from_raw(feature.geometry.clone())?;
    let projected = geometry.try_map_points(|p| {
        projection
            .from_geodetic(p.x, p.y)
            .map(|(x, y)| Point::new(x, y))
    })?;

    let style = &feature.style;
    let shape = match style.kind {
        StyleKind::Line { radius } => {
            let mut segments = Vec::new();
            collect_outline(&projected, &mut segments);
            Shape::WideLine {
                segments: Bvh::build(segments),
                radius,
            }
        }
        StyleKind::Fill => {
            let polygons = projected.polygons();
            if polygons.is_empty() {
                return Err(GeoError::InvalidGeometry(format!(
                    "feature {} has a fill style but no polygons",
                    feature.id
                )));
            }
            // Disjoint polygons combine under the even-odd rule
            let edges = polygons.into_iter().flat_map(polygon_edges).collect();
            Shape::FillPolygon { edges }
        }
    };

    VectorElement::new(
        feature.id.clone(),
        style.layer,
        shape,
        style.draw.clone(),
        style.weight,
    )
}

/// Build elements for a batch of features.
///
/// Features that fail validation or fall outside the projection are logged
/// and skipped. Any other failure aborts the batch.
pub fn build_elements<P, I>(features: I, projection: &P) -> GeoResult<Vec<VectorElement>>
where
    P: GeographicProjection + ?Sized,
    I: IntoIterator<Item = Feature>,
{
    let mut elements = Vec::new();
    let mut rejected = 0usize;

    for feature in features {
        match build_element(&feature, projection) {
            Ok(element) => elements.push(element),
            Err(e) if e.is_recoverable() => {
                warn!(feature = %feature.id, error = %e, "Feature rejected");
                rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(accepted = elements.len(), rejected, "Built vector elements");
    Ok(elements)
}

fn collect_outline(geometry: &Geometry, out: &mut Vec<Segment>) {
    match geometry {
        Geometry::Point(p) => out.push(Segment::new(p.x, p.y, p.x, p.y)),
        Geometry::LineString(line) => convert_to_segments(line, out),
        Geometry::MultiLineString(MultiLineString(lines)) => {
            lines.iter().for_each(|line| convert_to_segments(line, out))
        }
        Geometry::Polygon(polygon) => out.extend(polygon_edges(polygon)),
        Geometry::MultiPolygon(MultiPolygon(polygons)) => {
            polygons.iter().for_each(|p| out.extend(polygon_edges(p)))
        }
        Geometry::GeometryCollection(parts) => {
            parts.iter().for_each(|part| collect_outline(part, out))
        }
    }
}
