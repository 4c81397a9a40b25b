//! Error types for projection, geometry and rasterization code.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Primary error type shared by every crate in the workspace.
#[derive(Debug, Error)]
pub enum GeoError {
    // === Projection Errors ===
    #[error("Coordinate ({x}, {y}) has no representation in this projection")]
    OutOfDomain { x: f64, y: f64 },

    // === Geometry Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    // === Startup Errors ===
    #[error("Failed to load projection data: {0}")]
    DataLoadFailure(String),

    #[error("Invalid projection configuration: {0}")]
    InvalidConfig(String),
}

impl GeoError {
    /// Shorthand for an out-of-domain error at the given input coordinate.
    pub fn out_of_domain(x: f64, y: f64) -> Self {
        GeoError::OutOfDomain { x, y }
    }

    /// Whether a batch caller may skip the offending sample or feature and
    /// keep going.
    ///
    /// Projection misses and malformed features are expected at a low rate
    /// while processing real data; data-load and configuration failures
    /// mean the projection itself is unusable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GeoError::OutOfDomain { .. } | GeoError::InvalidGeometry(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::DataLoadFailure(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::InvalidConfig(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for GeoError {
    fn from(err: serde_yaml::Error) -> Self {
        GeoError::InvalidConfig(format!("YAML error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(GeoError::out_of_domain(1.0, 2.0).is_recoverable());
        assert!(GeoError::InvalidGeometry("short ring".into()).is_recoverable());
        assert!(!GeoError::DataLoadFailure("missing".into()).is_recoverable());
        assert!(!GeoError::InvalidConfig("bad".into()).is_recoverable());
    }

    #[test]
    fn test_io_error_is_data_load_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "conformal.txt");
        let err: GeoError = io.into();
        assert!(matches!(err, GeoError::DataLoadFailure(_)));
    }
}
