//! Shared test utilities for the mitgcm-grid workspace.
//!
//! - Synthetic MITgcm grids ([`SyntheticGrid`]) written to memory or to
//!   MDS directories
//! - Canned fixture domains
//! - Test data path helpers and a skip macro for optional real grids
//! - Tracing setup for tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{weddell_cutout, init_test_tracing};
//!
//! init_test_tracing();
//! let source = weddell_cutout().to_memory_source();
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Install a tracing subscriber that writes through the test harness.
///
/// Filtered by `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Skip a test if a real grid is not available.
///
/// ```ignore
/// #[test]
/// fn test_real_grid() {
///     let path = test_utils::require_test_grid!("WSFRIS");
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! require_test_grid {
    ($name:expr) => {{
        match $crate::find_test_grid($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test grid '{}' not found. Set MITGCM_TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Floating-point equality within `tol`, where NaN only equals NaN.
///
/// Masked grid fields carry NaN, so two NaNs compare equal here.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(-470.0, grid.bathy[[5, 0]], 1e-9);
/// assert_approx_eq!(f64::NAN, field[[0, 0]], 1e-9);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($expected:expr, $actual:expr, $tol:expr) => {{
        let (expected, actual, tol) = ($expected as f64, $actual as f64, $tol as f64);
        let close = if expected.is_nan() || actual.is_nan() {
            expected.is_nan() && actual.is_nan()
        } else {
            (expected - actual).abs() <= tol
        };
        if !close {
            panic!(
                "values differ: expected {} got {} (tolerance {})",
                expected, actual, tol
            );
        }
    }};
}

/// [`assert_approx_eq!`] over two float sequences, reporting the first
/// differing position.
#[macro_export]
macro_rules! assert_all_approx_eq {
    ($expected:expr, $actual:expr, $tol:expr) => {{
        let expected: Vec<f64> = $expected.into_iter().map(|v| v as f64).collect();
        let actual: Vec<f64> = $actual.into_iter().map(|v| v as f64).collect();
        assert_eq!(expected.len(), actual.len(), "sequence lengths differ");
        for (n, (e, a)) in expected.into_iter().zip(actual).enumerate() {
            let close = if e.is_nan() || a.is_nan() {
                e.is_nan() && a.is_nan()
            } else {
                (e - a).abs() <= $tol as f64
            };
            if !close {
                panic!("values differ at position {}: expected {} got {}", n, e, a);
            }
        }
    }};
}
