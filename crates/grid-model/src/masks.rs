//! Region mask builder.
//!
//! Pure functions from partial-cell fractions, coordinates and region
//! bounds to 2D boolean masks. `true` means the point is selected.
//!
//! Every function works on any of the t, u and v sub-grids; the caller
//! passes the hfac array and the `(lon, lat)` pair of that sub-grid.

use grid_common::{BoundingBox, RegionConfig};
use ndarray::{Array2, ArrayView2, ArrayView3, Axis, Zip};

/// Columns that are dry from top to bottom.
pub fn land_mask(hfac: ArrayView3<'_, f64>) -> Array2<bool> {
    hfac.sum_axis(Axis(0)).mapv(|total| total == 0.0)
}

/// Wet columns whose top cell is not completely open.
pub fn ice_mask(hfac: ArrayView3<'_, f64>) -> Array2<bool> {
    let (nz, ny, nx) = hfac.dim();
    if nz == 0 {
        return Array2::from_elem((ny, nx), false);
    }
    let total = hfac.sum_axis(Axis(0));
    let top = hfac.index_axis(Axis(0), 0);
    Zip::from(&total)
        .and(&top)
        .map_collect(|&total, &top| total != 0.0 && top < 1.0)
}

/// Filchner-Ronne Ice Shelf points.
///
/// Two boxes split at `fris_split_lon`: the western one includes the
/// split longitude, the eastern one starts just east of it and has a
/// more southerly latitude cap.
pub fn fris_mask(
    ice: ArrayView2<'_, bool>,
    lon: ArrayView2<'_, f64>,
    lat: ArrayView2<'_, f64>,
    regions: &RegionConfig,
) -> Array2<bool> {
    let west = regions.fris_west();
    let east = regions.fris_east();
    let split = regions.fris_split_lon;
    Zip::from(&ice)
        .and(&lon)
        .and(&lat)
        .map_collect(|&ice, &lon, &lat| {
            ice && (west.contains_point(lon, lat)
                || (lon > split && east.contains_point(lon, lat)))
        })
}

/// Ice shelf points inside a single box.
pub fn ice_in_box(
    ice: ArrayView2<'_, bool>,
    lon: ArrayView2<'_, f64>,
    lat: ArrayView2<'_, f64>,
    bounds: &BoundingBox,
) -> Array2<bool> {
    Zip::from(&ice)
        .and(&lon)
        .and(&lat)
        .map_collect(|&ice, &lon, &lat| ice && bounds.contains_point(lon, lat))
}

/// Eastern Weddell ice shelf points.
pub fn ewed_mask(
    ice: ArrayView2<'_, bool>,
    lon: ArrayView2<'_, f64>,
    lat: ArrayView2<'_, f64>,
    regions: &RegionConfig,
) -> Array2<bool> {
    ice_in_box(ice, lon, lat, &regions.ewed)
}

/// Southern Weddell Sea continental shelf points: open ocean, no ice
/// shelf above, shallower than the depth limit, inside the shelf box.
pub fn sws_shelf_mask(
    land: ArrayView2<'_, bool>,
    ice: ArrayView2<'_, bool>,
    bathy: ArrayView2<'_, f64>,
    lon: ArrayView2<'_, f64>,
    lat: ArrayView2<'_, f64>,
    regions: &RegionConfig,
) -> Array2<bool> {
    let bounds = regions.sws_shelf;
    let min_bathy = regions.sws_shelf_min_bathy;
    Zip::from(&land)
        .and(&ice)
        .and(&bathy)
        .and(&lon)
        .and(&lat)
        .map_collect(|&land, &ice, &bathy, &lon, &lat| {
            !land && !ice && bathy >= min_bathy && bounds.contains_point(lon, lat)
        })
}

/// Columns whose ice base and seafloor fall inside the same cell.
///
/// That is a column with exactly one wet cell, and that cell only
/// partially wet. Draft and bathymetry assume the wet part of a partial
/// cell sits at its top, which cannot hold for such a column.
///
/// Returns `(j, i)` indices.
pub fn find_ambiguous_partial_cells(hfac: ArrayView3<'_, f64>) -> Vec<(usize, usize)> {
    let (_, ny, nx) = hfac.dim();
    let mut found = Vec::new();
    for j in 0..ny {
        for i in 0..nx {
            let column = hfac.slice(ndarray::s![.., j, i]);
            let mut wet = column.iter().filter(|&&h| h != 0.0);
            if let (Some(&only), None) = (wet.next(), wet.next()) {
                if only < 1.0 {
                    found.push((j, i));
                }
            }
        }
    }
    found
}
