//! The model grid.

use std::path::Path;

use grid_common::longitude::is_strictly_increasing;
use grid_common::{GridError, GridResult, LonRange, SubGrid};
use grid_reader::{open_source, squeeze_1d, GridVariable, RawGridSource};
use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView1, ArrayView3, Ix2, Ix3};
use tracing::{debug, info};

use crate::coords::{max_column_deviation, max_row_deviation, Coordinates, PerSubGrid};
use crate::masks;
use crate::options::GridOptions;
use crate::traits::{IceShelfGrid, StaggeredGrid};

/// Tolerance (degrees) when checking that 2D coordinates are separable.
const SEPARABLE_TOLERANCE: f64 = 1e-6;

/// An MITgcm model grid with derived draft, bathymetry and masks.
///
/// Built once from raw grid variables and never modified afterwards.
///
/// # Precondition
///
/// Draft and bathymetry assume the wet part of a partial cell lies at the
/// top of the cell. A column whose ice base and seafloor share one partial
/// cell gets a wrong draft. Set
/// [`GridOptions::validate_partial_cells`] to reject such grids.
#[derive(Debug, Clone)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Range longitude was folded into; `None` when X is not longitude.
    pub lon_range: Option<LonRange>,
    pub coords: Coordinates,
    /// Width of the southern cell edge (m)
    pub dx_s: Array2<f64>,
    /// Height of the western cell edge (m)
    pub dy_w: Array2<f64>,
    /// Cell area (m^2)
    pub da: Array2<f64>,
    /// Depth of cell centres (negative, m)
    pub z: Array1<f64>,
    /// Depth of cell interfaces (negative, m), one longer than `z`
    pub z_edges: Array1<f64>,
    /// Cell thickness (m)
    pub dz: Array1<f64>,
    /// Distance between cell centres (m)
    pub dz_t: Array1<f64>,
    /// Partial-cell fractions on the t (hFacC), u (hFacW) and v (hFacS)
    /// sub-grids, `[nz, ny, nx]`
    pub hfac: PerSubGrid<Array3<f64>>,
    /// Water column thickness (m)
    pub wct: Array2<f64>,
    /// Ice shelf draft (negative, m); zero where there is no ice
    pub draft: Array2<f64>,
    /// Seafloor depth (negative, m)
    pub bathy: Array2<f64>,
    pub land_mask: PerSubGrid<Array2<bool>>,
    pub ice_mask: PerSubGrid<Array2<bool>>,
    pub fris_mask: PerSubGrid<Array2<bool>>,
    /// Eastern Weddell ice shelves, t-grid only
    pub ewed_mask: Array2<bool>,
    /// Southern Weddell Sea continental shelf, t-grid only
    pub sws_shelf_mask: Array2<bool>,
}

impl Grid {
    /// Build a grid from a NetCDF file or a directory of MDS files.
    pub fn open<P: AsRef<Path>>(path: P, options: &GridOptions) -> GridResult<Self> {
        let source = open_source(path)?;
        Self::from_source(&source, options)
    }

    /// Build a grid from any raw grid source.
    pub fn from_source<S>(source: &S, options: &GridOptions) -> GridResult<Self>
    where
        S: RawGridSource + ?Sized,
    {
        options.validate()?;

        let mut coords = read_coordinates(source)?;
        let (nx, ny) = (coords.nx(), coords.ny());

        let lon_range = if options.x_is_lon {
            let range = options
                .lon_range
                .unwrap_or_else(|| LonRange::detect(coords.lon_1d.iter().copied()));
            coords.normalize_longitude(range);
            if !is_strictly_increasing(coords.lon_1d.iter().copied()) {
                return Err(GridError::NonMonotonicLongitude {
                    max_lon: range.max_lon(),
                });
            }
            debug!(range = %range, detected = options.lon_range.is_none(), "Longitude normalized");
            Some(range)
        } else {
            None
        };

        let dx_s = read_2d(source, GridVariable::Dxg, (ny, nx))?;
        let dy_w = read_2d(source, GridVariable::Dyg, (ny, nx))?;
        let da = read_2d(source, GridVariable::Rac, (ny, nx))?;

        let z = read_1d(source, GridVariable::Rc)?;
        let nz = z.len();
        let z_edges = read_1d(source, GridVariable::Rf)?;
        let dz = read_1d(source, GridVariable::Drf)?;
        let dz_t = read_1d(source, GridVariable::Drc)?;
        check_len(GridVariable::Rf, &z_edges, nz + 1)?;
        check_len(GridVariable::Drf, &dz, nz)?;

        let hfac = PerSubGrid::try_build(|sub| read_3d(source, hfac_variable(sub), (nz, ny, nx)))?;
        let wct = read_2d(source, GridVariable::Depth, (ny, nx))?;

        if options.validate_partial_cells {
            let ambiguous = masks::find_ambiguous_partial_cells(hfac.t.view());
            if let Some(&(j, i)) = ambiguous.first() {
                return Err(GridError::geometry(format!(
                    "{} columns have the ice base and seafloor in the same partial cell, first at (j, i) = ({}, {})",
                    ambiguous.len(),
                    j,
                    i
                )));
            }
        }

        let draft = ice_draft(hfac.t.view(), z_edges.view(), dz.view());
        let bathy = &draft - &wct;

        let regions = &options.regions;
        let land_mask = hfac.map(|_, h| masks::land_mask(h.view()));
        let ice_mask = hfac.map(|_, h| masks::ice_mask(h.view()));
        let fris_mask = ice_mask.map(|sub, ice| {
            let (lon, lat) = coords.lon_lat_2d(sub.grid_type());
            masks::fris_mask(ice.view(), lon, lat, regions)
        });
        let ewed_mask = masks::ewed_mask(
            ice_mask.t.view(),
            coords.lon_2d.view(),
            coords.lat_2d.view(),
            regions,
        );
        let sws_shelf_mask = masks::sws_shelf_mask(
            land_mask.t.view(),
            ice_mask.t.view(),
            bathy.view(),
            coords.lon_2d.view(),
            coords.lat_2d.view(),
            regions,
        );

        info!(
            source = %source.describe(),
            nx = nx,
            ny = ny,
            nz = nz,
            lon_range = ?lon_range.map(|r| r.to_string()),
            "Grid built"
        );

        Ok(Self {
            nx,
            ny,
            nz,
            lon_range,
            coords,
            dx_s,
            dy_w,
            da,
            z,
            z_edges,
            dz,
            dz_t,
            hfac,
            wct,
            draft,
            bathy,
            land_mask,
            ice_mask,
            fris_mask,
            ewed_mask,
            sws_shelf_mask,
        })
    }
}

impl StaggeredGrid for Grid {
    fn nx(&self) -> usize {
        self.nx
    }

    fn ny(&self) -> usize {
        self.ny
    }

    fn nz(&self) -> usize {
        self.nz
    }

    fn coordinates(&self) -> &Coordinates {
        &self.coords
    }

    fn z(&self) -> ArrayView1<'_, f64> {
        self.z.view()
    }

    fn hfac_arrays(&self) -> &PerSubGrid<Array3<f64>> {
        &self.hfac
    }

    fn land_masks(&self) -> &PerSubGrid<Array2<bool>> {
        &self.land_mask
    }
}

impl IceShelfGrid for Grid {
    fn ice_masks(&self) -> &PerSubGrid<Array2<bool>> {
        &self.ice_mask
    }

    fn fris_masks(&self) -> &PerSubGrid<Array2<bool>> {
        &self.fris_mask
    }
}

/// Ice shelf draft from partial cells.
///
/// The first wet cell from the top sets the draft, with the wet fraction
/// taken from the bottom of that cell. Dry columns get zero.
pub fn ice_draft(
    hfac: ArrayView3<'_, f64>,
    z_edges: ArrayView1<'_, f64>,
    dz: ArrayView1<'_, f64>,
) -> Array2<f64> {
    let (nz, ny, nx) = hfac.dim();
    Array2::from_shape_fn((ny, nx), |(j, i)| {
        (0..nz)
            .find(|&k| hfac[[k, j, i]] != 0.0)
            .map_or(0.0, |k| z_edges[k] - dz[k] * (1.0 - hfac[[k, j, i]]))
    })
}

pub(crate) fn hfac_variable(sub: SubGrid) -> GridVariable {
    match sub {
        SubGrid::T => GridVariable::HFacC,
        SubGrid::U => GridVariable::HFacW,
        SubGrid::V => GridVariable::HFacS,
    }
}

fn read_coordinates<S>(source: &S) -> GridResult<Coordinates>
where
    S: RawGridSource + ?Sized,
{
    let (lon, lon_2d) = lon_axis(source.load(GridVariable::Xc)?, "XC")?;
    let (lat, lat_2d) = lat_axis(source.load(GridVariable::Yc)?, "YC")?;
    let (lon_corners, lon_corners_2d) = lon_axis(source.load(GridVariable::Xg)?, "XG")?;
    let (lat_corners, lat_corners_2d) = lat_axis(source.load(GridVariable::Yg)?, "YG")?;

    for (name, corners, centres) in [("XG", &lon_corners, &lon), ("YG", &lat_corners, &lat)] {
        if corners.len() != centres.len() {
            return Err(GridError::ShapeMismatch {
                variable: name.to_string(),
                expected: vec![centres.len()],
                found: vec![corners.len()],
            });
        }
    }

    let mut coords = Coordinates::from_axes(lon, lat, lon_corners, lat_corners);
    let shape = (coords.ny(), coords.nx());

    // Keep the raw 2D arrays where the source has them
    let raw_meshes = [
        (&mut coords.lon_2d, lon_2d, "XC"),
        (&mut coords.lat_2d, lat_2d, "YC"),
        (&mut coords.lon_corners_2d, lon_corners_2d, "XG"),
        (&mut coords.lat_corners_2d, lat_corners_2d, "YG"),
    ];
    for (slot, raw, name) in raw_meshes {
        if let Some(raw) = raw {
            if raw.dim() != shape {
                return Err(GridError::ShapeMismatch {
                    variable: name.to_string(),
                    expected: vec![shape.0, shape.1],
                    found: raw.shape().to_vec(),
                });
            }
            *slot = raw;
        }
    }
    Ok(coords)
}

/// Longitude axis from a 1D array or row 0 of a separable 2D array.
pub(crate) fn lon_axis(raw: ArrayD<f64>, name: &str) -> GridResult<(Array1<f64>, Option<Array2<f64>>)> {
    match raw.ndim() {
        1 => Ok((raw.iter().copied().collect(), None)),
        2 => {
            let mesh = into_2d(raw, name)?;
            if max_row_deviation(&mesh.view()) > SEPARABLE_TOLERANCE {
                return Err(GridError::NonSeparable(name.to_string()));
            }
            Ok((mesh.row(0).to_owned(), Some(mesh)))
        }
        rank => Err(GridError::UnsupportedRank {
            variable: name.to_string(),
            rank,
        }),
    }
}

/// Latitude axis from a 1D array or column 0 of a separable 2D array.
pub(crate) fn lat_axis(raw: ArrayD<f64>, name: &str) -> GridResult<(Array1<f64>, Option<Array2<f64>>)> {
    match raw.ndim() {
        1 => Ok((raw.iter().copied().collect(), None)),
        2 => {
            let mesh = into_2d(raw, name)?;
            if max_column_deviation(&mesh.view()) > SEPARABLE_TOLERANCE {
                return Err(GridError::NonSeparable(name.to_string()));
            }
            Ok((mesh.column(0).to_owned(), Some(mesh)))
        }
        rank => Err(GridError::UnsupportedRank {
            variable: name.to_string(),
            rank,
        }),
    }
}

fn into_2d(raw: ArrayD<f64>, name: &str) -> GridResult<Array2<f64>> {
    let found = raw.shape().to_vec();
    if found.iter().any(|&n| n == 0) {
        return Err(GridError::ShapeMismatch {
            variable: name.to_string(),
            expected: vec![1, 1],
            found,
        });
    }
    raw.into_dimensionality::<Ix2>()
        .map_err(|_| GridError::UnsupportedRank {
            variable: name.to_string(),
            rank: found.len(),
        })
}

fn read_1d<S>(source: &S, var: GridVariable) -> GridResult<Array1<f64>>
where
    S: RawGridSource + ?Sized,
{
    let name = var.name(source.kind());
    squeeze_1d(source.load(var)?, name).map_err(|e| e.into_load_error(name, &source.describe()))
}

fn read_2d<S>(source: &S, var: GridVariable, shape: (usize, usize)) -> GridResult<Array2<f64>>
where
    S: RawGridSource + ?Sized,
{
    let raw = source.load(var)?;
    let found = raw.shape().to_vec();
    let mismatch = || GridError::ShapeMismatch {
        variable: var.name(source.kind()).to_string(),
        expected: vec![shape.0, shape.1],
        found: found.clone(),
    };
    let array = raw.into_dimensionality::<Ix2>().map_err(|_| mismatch())?;
    if array.dim() != shape {
        return Err(mismatch());
    }
    Ok(array)
}

pub(crate) fn read_3d<S>(
    source: &S,
    var: GridVariable,
    shape: (usize, usize, usize),
) -> GridResult<Array3<f64>>
where
    S: RawGridSource + ?Sized,
{
    let raw = source.load(var)?;
    let found = raw.shape().to_vec();
    let mismatch = || GridError::ShapeMismatch {
        variable: var.name(source.kind()).to_string(),
        expected: vec![shape.0, shape.1, shape.2],
        found: found.clone(),
    };
    // A single-level grid may come without its depth axis
    let raw = if raw.ndim() == 2 && shape.0 == 1 {
        raw.insert_axis(ndarray::Axis(0))
    } else {
        raw
    };
    let array = raw.into_dimensionality::<Ix3>().map_err(|_| mismatch())?;
    if array.dim() != shape {
        return Err(mismatch());
    }
    Ok(array)
}

fn check_len(var: GridVariable, array: &Array1<f64>, expected: usize) -> GridResult<()> {
    if array.len() != expected {
        return Err(GridError::ShapeMismatch {
            variable: var.mds_name().to_string(),
            expected: vec![expected],
            found: vec![array.len()],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_draft_half_open_top_cell() {
        let hfac = Array3::from_shape_fn((3, 4, 4), |(k, _, _)| if k == 0 { 0.5 } else { 1.0 });
        let z_edges = array![0.0, -10.0, -20.0, -30.0];
        let dz = array![10.0, 10.0, 10.0];
        let draft = ice_draft(hfac.view(), z_edges.view(), dz.view());
        assert!(draft.iter().all(|&d| d == -5.0));
    }

    #[test]
    fn test_draft_below_dry_cells() {
        let mut hfac = Array3::zeros((3, 1, 3));
        hfac[[1, 0, 1]] = 1.0;
        hfac[[1, 0, 2]] = 0.25;
        hfac[[2, 0, 2]] = 1.0;
        let z_edges = array![0.0, -10.0, -20.0, -30.0];
        let dz = array![10.0, 10.0, 10.0];
        let draft = ice_draft(hfac.view(), z_edges.view(), dz.view());
        assert_eq!(draft, array![[0.0, -10.0, -17.5]]);
    }

    #[test]
    fn test_lon_axis_rank() {
        let raw = ArrayD::zeros(ndarray::IxDyn(&[2, 2, 2]));
        assert!(matches!(
            lon_axis(raw, "XC"),
            Err(GridError::UnsupportedRank { rank: 3, .. })
        ));
    }

    #[test]
    fn test_lon_axis_rejects_curvilinear() {
        let raw = array![[0.0, 1.0], [0.5, 1.5]].into_dyn();
        assert!(matches!(lon_axis(raw, "XC"), Err(GridError::NonSeparable(_))));
    }

    #[test]
    fn test_lat_axis_from_mesh() {
        let raw = array![[-80.0, -80.0], [-79.5, -79.5]].into_dyn();
        let (axis, mesh) = lat_axis(raw, "YC").unwrap();
        assert_eq!(axis, array![-80.0, -79.5]);
        assert!(mesh.is_some());
    }
}
