//! Common types and utilities shared across the MITgcm grid crates.

pub mod bbox;
pub mod config;
pub mod error;
pub mod gtype;
pub mod longitude;

pub use bbox::BoundingBox;
pub use config::RegionConfig;
pub use error::{Direction, ErrorCategory, GridError, GridResult};
pub use gtype::{AxisDim, GridType, SubGrid};
pub use longitude::{LonRange, Split};
