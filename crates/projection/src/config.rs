//! Serializable projection pipelines.
//!
//! A pipeline is a tree of wrappers around one base projection, written as
//! externally tagged JSON or YAML:
//!
//! ```json
//! {"scale": {"delegate": {"flip_vertical": {"delegate":
//!     {"modified_airocean": {"field": {"path": "conformal.txt"}}}}},
//!   "x": 7318261.522857145, "y": 7318261.522857145}}
//! ```

use std::path::Path;

use geo_common::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::airocean::Airocean;
use crate::conformal::{ConformalAirocean, FIELD_SIDE};
use crate::geographic::{Equirectangular, GeographicProjection};
use crate::modified::ModifiedAirocean;
use crate::source::FieldSource;
use crate::transform::{FlipVertical, Offset, Scaled, SwapAxes};

/// Projected units per conformal net unit in the standard world map.
pub const BTE_SCALE: f64 = 7_318_261.522_857_145;

fn default_field_side() -> usize {
    FIELD_SIDE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionConfig {
    Equirectangular,
    Airocean,
    ConformalAirocean {
        field: FieldSource,
        #[serde(default = "default_field_side")]
        side: usize,
    },
    /// Bering-Strait orientation of the conformal net.
    ModifiedAirocean {
        field: FieldSource,
        #[serde(default = "default_field_side")]
        side: usize,
    },
    Scale {
        delegate: Box<ProjectionConfig>,
        x: f64,
        y: f64,
    },
    Offset {
        delegate: Box<ProjectionConfig>,
        dx: f64,
        dy: f64,
    },
    FlipVertical {
        delegate: Box<ProjectionConfig>,
    },
    SwapAxes {
        delegate: Box<ProjectionConfig>,
    },
}

impl ProjectionConfig {
    /// The standard world map: the modified conformal net, flipped so y
    /// grows southward and scaled to meters.
    pub fn bte_world(field: FieldSource) -> Self {
        ProjectionConfig::Scale {
            delegate: Box::new(ProjectionConfig::FlipVertical {
                delegate: Box::new(ProjectionConfig::ModifiedAirocean {
                    field,
                    side: FIELD_SIDE,
                }),
            }),
            x: BTE_SCALE,
            y: BTE_SCALE,
        }
    }

    pub fn from_json(text: &str) -> GeoResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// YAML is read through the JSON data model so both formats share the
    /// single-key-map encoding of variants.
    pub fn from_yaml(text: &str) -> GeoResult<Self> {
        let value: serde_json::Value = serde_yaml::from_str(text)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    ///
    /// Relative field paths are resolved against the config file's
    /// directory.
    pub fn from_file(path: impl AsRef<Path>) -> GeoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GeoError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;

        let mut config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&text)?,
            other => {
                return Err(GeoError::InvalidConfig(format!(
                    "unsupported config extension {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        match self {
            ProjectionConfig::ConformalAirocean { field, .. }
            | ProjectionConfig::ModifiedAirocean { field, .. } => {
                if let FieldSource::Path(p) = field {
                    if p.is_relative() {
                        *p = base.join(&*p);
                    }
                }
            }
            ProjectionConfig::Scale { delegate, .. }
            | ProjectionConfig::Offset { delegate, .. }
            | ProjectionConfig::FlipVertical { delegate }
            | ProjectionConfig::SwapAxes { delegate } => delegate.resolve_paths(base),
            ProjectionConfig::Equirectangular | ProjectionConfig::Airocean => {}
        }
    }

    pub fn to_json(&self) -> GeoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Construct the described projection, loading any field tables.
    pub fn build(&self) -> GeoResult<Box<dyn GeographicProjection>> {
        let projection: Box<dyn GeographicProjection> = match self {
            ProjectionConfig::Equirectangular => Box::new(Equirectangular),
            ProjectionConfig::Airocean => Box::new(Airocean::new()),
            ProjectionConfig::ConformalAirocean { field, side } => {
                Box::new(ConformalAirocean::load_with_side(field, *side)?)
            }
            ProjectionConfig::ModifiedAirocean { field, side } => Box::new(ModifiedAirocean::new(
                ConformalAirocean::load_with_side(field, *side)?,
            )),
            ProjectionConfig::Scale { delegate, x, y } => {
                Box::new(Scaled::new(delegate.build()?, *x, *y)?)
            }
            ProjectionConfig::Offset { delegate, dx, dy } => {
                Box::new(Offset::new(delegate.build()?, *dx, *dy))
            }
            ProjectionConfig::FlipVertical { delegate } => {
                Box::new(FlipVertical::new(delegate.build()?))
            }
            ProjectionConfig::SwapAxes { delegate } => Box::new(SwapAxes::new(delegate.build()?)),
        };
        debug!(kind = self.kind(), "Built projection");
        Ok(projection)
    }

    fn kind(&self) -> &'static str {
        match self {
            ProjectionConfig::Equirectangular => "equirectangular",
            ProjectionConfig::Airocean => "airocean",
            ProjectionConfig::ConformalAirocean { .. } => "conformal_airocean",
            ProjectionConfig::ModifiedAirocean { .. } => "modified_airocean",
            ProjectionConfig::Scale { .. } => "scale",
            ProjectionConfig::Offset { .. } => "offset",
            ProjectionConfig::FlipVertical { .. } => "flip_vertical",
            ProjectionConfig::SwapAxes { .. } => "swap_axes",
        }
    }
}
