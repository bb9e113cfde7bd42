//! Error types for raw grid reading.

use grid_common::GridError;
use thiserror::Error;

/// Result type for reader operations.
pub type ReaderResult<T> = Result<T, ReaderError>;

/// Error types for reading raw grid variables.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Variable not present in the source
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Malformed MDS metadata file
    #[error("Invalid metadata: {0}")]
    InvalidMeta(String),

    /// Data does not match its declared shape or precision
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// MDS output split into tiles
    #[error("Tiled MDS output is not supported: {0}")]
    Tiled(String),

    /// NetCDF library error
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] ::netcdf::Error),
}

impl ReaderError {
    /// Attach the variable name and source location, producing a load error.
    pub fn into_load_error(self, variable: &str, location: &str) -> GridError {
        GridError::load(variable, location, self.to_string())
    }
}
