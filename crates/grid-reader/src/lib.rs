//! Raw grid loader for MITgcm output.
//!
//! Grid variables are read by name from one of:
//!
//! - a directory of MDS files (`XC.meta` + `XC.data`, big-endian binary),
//!   as written by MITgcm itself
//! - a NetCDF file produced by xmitgcm (behind the `netcdf` feature)
//! - an in-memory map of arrays
//!
//! The two file conventions spell some variables differently (`DXG` vs
//! `dxG`, `RC` vs `Z`, ...). [`GridVariable`] knows both spellings and
//! every source falls back to the other spelling when the native one is
//! absent.
//!
//! # Example
//!
//! ```ignore
//! use grid_reader::{open_source, GridVariable};
//!
//! let source = open_source("../grid/")?;
//! let hfac = source.load(GridVariable::HFacC)?;
//! ```

pub mod error;
pub mod mds;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod nc;
pub mod source;
pub mod variable;

pub use error::{ReaderError, ReaderResult};
pub use mds::{write_mds, write_mds_records, MdsDirectory, MdsMeta, Precision};
pub use memory::MemorySource;
#[cfg(feature = "netcdf")]
pub use nc::NetCdfFile;
pub use source::{open_source, squeeze_1d, RawGridSource};
pub use variable::{GridVariable, SourceKind};
