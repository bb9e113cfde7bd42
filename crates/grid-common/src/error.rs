//! Error types for grid construction and access.

use std::fmt;

use thiserror::Error;

use crate::gtype::GridType;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Primary error type for grid construction and accessors.
///
/// Every failure is fatal for the operation that raised it: a grid whose
/// construction returned an error does not exist.
#[derive(Debug, Error)]
pub enum GridError {
    // === Load Errors ===
    #[error("Failed to load '{variable}' from {location}: {message}")]
    Load {
        variable: String,
        location: String,
        message: String,
    },

    #[error("{0} is neither a NetCDF file nor a directory")]
    NotAGridSource(String),

    // === Configuration Errors ===
    #[error("Invalid grid type '{0}': expected one of t, u, v, psi, w")]
    InvalidGridType(String),

    #[error("Invalid dimension {0}: must be 1 or 2")]
    InvalidDim(usize),

    #[error("Invalid split {0}: must be 180 or 0")]
    InvalidSplit(i64),

    #[error("Longitude is not strictly increasing in the range ({lower}, {max_lon}]", lower = .max_lon - 360.0)]
    NonMonotonicLongitude { max_lon: f64 },

    #[error("Split mismatch: {0}")]
    SplitMismatch(String),

    #[error("Unsupported rank {rank} for coordinate variable '{variable}': expected 1 or 2")]
    UnsupportedRank { variable: String, rank: usize },

    #[error("Coordinate variable '{0}' is not separable into 1D axes (curvilinear grids are not supported)")]
    NonSeparable(String),

    #[error("Shape mismatch for '{variable}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        variable: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Not allowed to extend {0}ward")]
    DisallowedExtension(Direction),

    #[error("{0} bound not cleared")]
    BoundNotCleared(Direction),

    #[error("Invalid geometry: {0}")]
    Geometry(String),

    #[error("Invalid field dimensions '{0}': expected one of xy, xyt, xyz, xyzt")]
    InvalidFieldDims(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Unsupported Operations ===
    #[error("No {field} exists for the {gtype} grid")]
    NoSuchField { field: &'static str, gtype: GridType },

    #[error("Interpolation from the {from}-grid to the {to}-grid is not supported")]
    UnsupportedInterpolation { from: GridType, to: GridType },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// The three failure families a caller can distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A required raw variable is missing or unreadable.
    Load,
    /// A parameter is invalid or the derived geometry contradicts itself.
    Configuration,
    /// The grid variant structurally cannot satisfy the request.
    UnsupportedOperation,
}

impl GridError {
    /// Create a Load error.
    pub fn load(
        variable: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Load {
            variable: variable.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a Geometry error.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Get the failure family for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GridError::Load { .. } | GridError::NotAGridSource(_) => ErrorCategory::Load,

            GridError::NoSuchField { .. }
            | GridError::UnsupportedInterpolation { .. }
            | GridError::Unsupported(_) => ErrorCategory::UnsupportedOperation,

            _ => ErrorCategory::Configuration,
        }
    }
}

/// One side of a three-dimensional domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    West,
    East,
    South,
    North,
    Shallow,
    Deep,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::West => "west",
            Self::East => "east",
            Self::South => "south",
            Self::North => "north",
            Self::Shallow => "shallow",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<serde_yaml::Error> for GridError {
    fn from(err: serde_yaml::Error) -> Self {
        GridError::InvalidConfig(format!("YAML error: {}", err))
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::InvalidConfig(format!("JSON error: {}", err))
    }
}
