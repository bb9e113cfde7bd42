//! Grid-type interpolation and field masking.

use grid_common::{ErrorCategory, GridError, GridType, Split};
use grid_model::{
    interp_grid, interp_grid_mask_shelf, mask_3d, mask_land, mask_land_ice, Grid, GridOptions,
    SoseGrid, SoseOptions,
};
use ndarray::{Array2, ArrayD, IxDyn};
use test_utils::{sose_like_global, weddell_cutout};

fn weddell() -> Grid {
    Grid::from_source(&weddell_cutout().to_memory_source(), &GridOptions::default())
        .expect("Failed to build grid")
}

fn ones(shape: &[usize]) -> ArrayD<f64> {
    ArrayD::from_elem(IxDyn(shape), 1.0)
}

#[test]
fn test_u_to_t_midpoints() {
    let grid = weddell();
    let data = Array2::from_shape_fn((10, 25), |(_, i)| i as f64).into_dyn();
    let out = interp_grid(data, &grid, GridType::U, GridType::T, false).unwrap();

    assert_eq!(out.shape(), &[10, 25]);
    assert_eq!(out[[5, 0]], 0.5);
    assert_eq!(out[[5, 10]], 10.5);
    // Easternmost column copied
    assert_eq!(out[[5, 24]], 24.0);
    // Land row
    assert!(out[[0, 3]].is_nan());
}

#[test]
fn test_v_to_t_depth_dependent() {
    let grid = weddell();
    let out = interp_grid(ones(&[6, 10, 25]), &grid, GridType::V, GridType::T, false).unwrap();

    assert_eq!(out.shape(), &[6, 10, 25]);
    // Open water both sides
    assert_eq!(out[[0, 5, 3]], 1.0);
    // Partial seafloor cell is wet
    assert_eq!(out[[5, 5, 3]], 1.0);
    // Under the ice shelf the top cell is dry
    assert!(out[[0, 2, 3]].is_nan());
    // Row next to land picks up the NaN from the south
    assert!(out[[2, 0, 3]].is_nan());
}

#[test]
fn test_time_dependent_field() {
    let grid = weddell();
    let out = interp_grid(ones(&[2, 10, 25]), &grid, GridType::U, GridType::T, true).unwrap();
    assert_eq!(out.shape(), &[2, 10, 25]);
    assert!(out[[1, 0, 0]].is_nan());
    assert_eq!(out[[1, 9, 0]], 1.0);
}

#[test]
fn test_mask_shelf_masks_ice() {
    let grid = weddell();
    let plain = interp_grid(ones(&[10, 25]), &grid, GridType::U, GridType::T, false).unwrap();
    let shelf = interp_grid_mask_shelf(ones(&[10, 25]), &grid, GridType::U, GridType::T, false).unwrap();
    assert_eq!(plain[[2, 3]], 1.0);
    assert!(shelf[[2, 3]].is_nan());
    assert_eq!(shelf[[6, 3]], 1.0);
}

#[test]
fn test_mask_shelf_rejects_depth() {
    let grid = weddell();
    let err =
        interp_grid_mask_shelf(ones(&[6, 10, 25]), &grid, GridType::U, GridType::T, false).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedOperation);
}

#[test]
fn test_unsupported_pairs() {
    let grid = weddell();
    for (from, to) in [
        (GridType::Psi, GridType::T),
        (GridType::T, GridType::U),
        (GridType::U, GridType::V),
    ] {
        let err = interp_grid(ones(&[10, 25]), &grid, from, to, false).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedInterpolation { .. }));
    }
}

#[test]
fn test_mask_helpers() {
    let grid = weddell();

    let land = mask_land(ones(&[10, 25]), &grid, GridType::T, false).unwrap();
    assert!(land[[0, 0]].is_nan());
    assert_eq!(land[[2, 0]], 1.0);

    let land_ice = mask_land_ice(ones(&[10, 25]), &grid, GridType::T, false).unwrap();
    assert!(land_ice[[2, 0]].is_nan());
    assert_eq!(land_ice[[2, 24]], 1.0);

    let wet = mask_3d(ones(&[3, 6, 10, 25]), &grid, GridType::T, true).unwrap();
    assert!(wet[[2, 0, 2, 0]].is_nan());
    assert_eq!(wet[[2, 1, 2, 0]], 1.0);
}

#[test]
fn test_mask_shape_mismatch() {
    let grid = weddell();
    let err = mask_land(ones(&[10, 24]), &grid, GridType::T, false).unwrap_err();
    assert!(matches!(err, GridError::ShapeMismatch { .. }));
}

#[test]
fn test_interp_on_sose_grid() {
    let source = sose_like_global().to_memory_source();
    let sose = SoseGrid::aligned(source, &weddell(), SoseOptions::with_split(Split::Antimeridian))
        .unwrap();
    let out = interp_grid(ones(&[12, 52]), &sose, GridType::U, GridType::T, false).unwrap();
    assert!(out[[0, 0]].is_nan());
    assert_eq!(out[[11, 0]], 1.0);
}
