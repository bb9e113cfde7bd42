//! MITgcm grid model.
//!
//! Builds an in-memory description of a model grid from raw MITgcm grid
//! variables and derives everything downstream analysis needs:
//!
//! - **Coordinates**: longitude normalized into one periodic range, 1D
//!   axes and 2D meshes for each staggered point type
//! - **Geometry**: cell sizes, depth axes, partial-cell fractions
//! - **Derived fields**: ice shelf draft and bathymetry
//! - **Masks**: land, ice shelf and named regional masks on the t, u and
//!   v sub-grids
//!
//! A second grid from the SOSE reanalysis can be aligned cell-for-cell
//! with a model grid ([`SoseGrid`]), and fields can be moved between
//! staggered point types ([`interp_grid`]).
//!
//! # Architecture
//!
//! ```text
//! RawGridSource (MDS directory / NetCDF / memory)
//!      │
//!      ▼
//! Grid::from_source
//!      │
//!      ├─► Coordinates: lon/lat axes, longitude normalization
//!      ├─► draft / bathy from hFacC
//!      └─► masks: land, ice, FRIS, EWed, SWS shelf
//!               │
//!               ▼
//!          SoseGrid::aligned(source, &grid, ..)   interp_grid(data, &grid, ..)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_model::{Grid, GridOptions, IceShelfGrid, StaggeredGrid};
//! use grid_common::{AxisDim, GridType};
//!
//! let grid = Grid::open("../grid/", &GridOptions::default())?;
//! let (lon, lat) = grid.get_lon_lat(GridType::U, AxisDim::Two).into_2d()?;
//! let fris = grid.get_fris_mask(GridType::T)?;
//! ```

pub mod coords;
pub mod grid;
pub mod interpolation;
pub mod masks;
pub mod options;
pub mod resolve;
pub mod sose;
pub mod traits;

pub use coords::{split_longitude, Coordinates, LonLat, PerSubGrid};
pub use grid::Grid;
pub use interpolation::{interp_grid, interp_grid_mask_shelf, mask_3d, mask_land, mask_land_ice};
pub use options::{GridOptions, GridPaths, SoseOptions};
pub use resolve::{
    choose_default_grid, choose_grid, grid_check_split, grid_check_split_source, GridArg,
};
pub use sose::{AxisWindow, FieldDims, Reindex, SoseGrid};
pub use traits::{IceShelfGrid, StaggeredGrid};
