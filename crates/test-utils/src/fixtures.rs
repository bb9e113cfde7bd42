//! Canned grids for the test suite.

use crate::generators::SyntheticGrid;

/// Weddell Sea cut-out: 2° x 1° cells from 70°W to 20°W and 80°S to 70°S,
/// six layers down to 630 m.
///
/// - the southernmost row is land
/// - an ice shelf covers 79°S to 76°S west of 30°W, its base half way
///   into the second layer
/// - south of 72°S the seafloor sits half way into the bottom layer
///   (470 m), north of it the column is open to the bottom
pub fn weddell_cutout() -> SyntheticGrid {
    let mut grid = SyntheticGrid::regular(
        (-69.0, 2.0, 25),
        (-79.5, 1.0, 10),
        vec![10.0, 20.0, 40.0, 80.0, 160.0, 320.0],
    );
    for j in 0..grid.ny() {
        for i in 0..grid.nx() {
            let (lon, lat) = (grid.lon[i], grid.lat[j]);
            if j == 0 {
                grid = grid.with_land(j, i);
                continue;
            }
            if lat < -72.0 {
                grid = grid.with_seafloor(j, i, 5, 0.5);
            }
            if lat < -76.0 && lon < -30.0 {
                grid = grid.with_ice_shelf(j, i, 1, 0.5);
            }
        }
    }
    grid
}

/// SOSE-like global product: 1° cells, 0°E to 360°E, 78°S to 30°S, five
/// layers down to 310 m. Rows south of 76°S are land.
pub fn sose_like_global() -> SyntheticGrid {
    let mut grid = SyntheticGrid::regular(
        (0.5, 1.0, 360),
        (-77.5, 1.0, 48),
        vec![10.0, 20.0, 40.0, 80.0, 160.0],
    );
    for j in 0..grid.ny() {
        if grid.lat[j] < -76.0 {
            for i in 0..grid.nx() {
                grid = grid.with_land(j, i);
            }
        }
    }
    grid
}

/// The 4 x 4 x 3 grid with a half-open top layer everywhere and a
/// 25 m water column: draft -5 m, bathymetry -30 m.
pub fn half_open_top() -> SyntheticGrid {
    let mut grid = SyntheticGrid::regular((0.5, 1.0, 4), (-70.5, 1.0, 4), vec![10.0, 10.0, 10.0]);
    for j in 0..4 {
        for i in 0..4 {
            grid.set_column(j, i, &[0.5, 1.0, 1.0]);
        }
    }
    grid.with_depth(ndarray::Array2::from_elem((4, 4), 25.0))
}

/// A domain crossing the date line, centre longitudes
/// `[170, 175, -175, -170]`.
pub fn date_line_strip() -> SyntheticGrid {
    SyntheticGrid::new(
        vec![170.0, 175.0, -175.0, -170.0],
        vec![-70.5, -69.5],
        vec![10.0, 20.0],
    )
}
