//! Tile rasterization of projected vector data.
//!
//! Features are validated, projected and cut into segments once, indexed
//! by bounds, and then drawn tile by tile:
//! - Width-buffered lines (point-to-segment distance)
//! - Even-odd scanline polygon fill
//! - Pluggable per-cell drawing strategies

pub mod draw;
pub mod element;
pub mod ingest;
pub mod line;
pub mod polygon;
pub mod rasterize;
pub mod tile;

pub use draw::DrawFunction;
pub use element::{Shape, VectorElement};
pub use ingest::{build_element, build_elements, ElementStyle, Feature};
pub use polygon::scanline_crossings;
pub use rasterize::TileRasterizer;
pub use tile::{TilePos, TileRaster, TILE_SIZE};
