//! Shared test utilities for the airocean tile workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers and a skip macro for the optional conformal table
//! - Seeded random segment and box generators
//! - Synthetic conformal field text
//! - Control points and polygon fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_test_file, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// The full 256-row conformal table is not checked in, so tests that pin
/// published control points skip when it is absent.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_paris() {
///     let path = require_test_file!("conformal.txt");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Download test data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Assert two scalars differ by at most `epsilon`. NaN never passes.
///
/// ```ignore
/// assert_approx_eq!(lat, 48.856667, 1e-7);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left;
        let right: f64 = $right;
        let epsilon: f64 = $epsilon;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: {} and {} differ by {} (epsilon {})",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert two `(x, y)` pairs agree on both axes within `epsilon`.
///
/// Either side may be any expression producing `(f64, f64)`, such as a
/// projection result.
///
/// ```ignore
/// let projected = p.from_geodetic(lon, lat).unwrap();
/// assert_coords_approx_eq!(projected, (2853163.1, -5051046.6), 0.1);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (lx, ly): (f64, f64) = $left;
        let (rx, ry): (f64, f64) = $right;
        let epsilon: f64 = $epsilon;
        if !((lx - rx).abs() <= epsilon && (ly - ry).abs() <= epsilon) {
            panic!(
                "assertion failed: ({}, {}) and ({}, {}) differ by more than {}",
                lx, ly, rx, ry, epsilon
            );
        }
    }};
}
