//! Icosahedral map projections.
//!
//! Implements the Airocean (Dymaxion) projection, its conformal refinement
//! driven by a sampled vector field, and the Bering-Strait orientation used
//! for the world map, together with the affine wrappers and serde config
//! that compose them into a pipeline.

pub mod airocean;
pub mod config;
pub mod conformal;
pub mod geographic;
pub mod math;
pub mod modified;
pub mod source;
pub mod transform;
pub mod vector_field;

pub use airocean::{Airocean, IcosahedralNet};
pub use config::ProjectionConfig;
pub use conformal::{ConformalAirocean, VECTOR_SCALE_FACTOR};
pub use geographic::{Equirectangular, GeographicProjection};
pub use modified::ModifiedAirocean;
pub use source::FieldSource;
pub use transform::{FlipVertical, Offset, Scaled, SwapAxes};
pub use vector_field::{FieldSample, TriangulatedVectorField};
