//! SOSE grid alignment against synthetic model grids.

use grid_common::{Direction, ErrorCategory, GridError, Split};
use grid_model::{FieldDims, Grid, GridOptions, SoseGrid, SoseOptions, StaggeredGrid};
use grid_reader::{write_mds, write_mds_records, MemorySource, Precision};
use ndarray::{s, Array3};
use test_utils::{
    assert_all_approx_eq, index_field, init_test_tracing, sose_like_global, temp_grid_dir,
    weddell_cutout, SyntheticGrid,
};

/// Native longitude index of the first aligned column for the Weddell
/// target with split=180: rotated index 109 is native 289 (70.5W).
const WEDDELL_I0_NATIVE: usize = 289;

/// Rows added south of the SOSE-like product for the Weddell target.
const WEDDELL_J_EXTEND: usize = 3;

fn weddell_target() -> Grid {
    Grid::from_source(&weddell_cutout().to_memory_source(), &GridOptions::default())
        .expect("Failed to build target grid")
}

fn sose_source() -> MemorySource {
    let sose = sose_like_global();
    let theta = index_field(sose.nz(), sose.ny(), sose.nx());
    let sea_ice = Array3::from_shape_fn((3, sose.ny(), sose.nx()), |(t, j, i)| {
        t as f64 * 1e6 + j as f64 * 1e3 + i as f64
    });
    let mut source = sose.to_memory_source();
    source.insert("THETA", theta.into_dyn());
    source.insert("SIarea", sea_ice.into_dyn());
    source.insert("ETAN", index_field(1, sose.ny(), sose.nx()).index_axis_move(ndarray::Axis(0), 0).into_dyn());
    source
}

fn weddell_sose() -> SoseGrid<MemorySource> {
    SoseGrid::aligned(
        sose_source(),
        &weddell_target(),
        SoseOptions::with_split(Split::Antimeridian),
    )
    .expect("Failed to align SOSE grid")
}

// =============================================================================
// Alignment
// =============================================================================

#[test]
fn test_weddell_alignment_dims() {
    init_test_tracing();
    let sose = weddell_sose();
    assert_eq!((sose.nx, sose.ny, sose.nz), (52, 12, 6));
    assert!(sose.trim_extend());
    assert_eq!(sose.split(), Split::Antimeridian);

    let reindex = sose.reindex().unwrap();
    assert_eq!(reindex.i_split, 180);
    assert_eq!(reindex.x.source_range(), 109..161);
    assert_eq!(reindex.y.start_after, WEDDELL_J_EXTEND);
    assert_eq!(reindex.z.extended_end(), 1);
}

#[test]
fn test_weddell_alignment_covers_target() {
    let target = weddell_target();
    let sose = weddell_sose();
    let c = &sose.coords;
    let t = &target.coords;

    let first = |a: &ndarray::Array1<f64>| a[0];
    let last = |a: &ndarray::Array1<f64>| a[a.len() - 1];

    assert!(first(&c.lon_corners_1d) <= first(&t.lon_corners_1d));
    assert!(last(&c.lon_corners_1d) >= last(&t.lon_1d));
    assert!(first(&c.lat_corners_1d) <= first(&t.lat_corners_1d));
    assert!(last(&c.lat_corners_1d) >= last(&t.lat_1d));
    assert!(sose.z[0] >= target.z[0]);
    assert!(last(&sose.z) <= last(&target.z));
}

#[test]
fn test_weddell_alignment_axes() {
    let sose = weddell_sose();
    assert_eq!(sose.coords.lon_1d[0], -70.5);
    assert_eq!(sose.coords.lon_corners_1d[0], -71.0);
    assert_eq!(sose.coords.lon_corners_1d[51], -20.0);
    assert_eq!(sose.coords.lat_1d[0], -80.5);
    assert_eq!(sose.coords.lat_1d[11], -69.5);
    assert_eq!(sose.coords.lat_corners_1d[0], -81.0);
    assert_eq!(sose.z.to_vec(), vec![-5.0, -20.0, -50.0, -110.0, -230.0, -710.0]);
}

#[test]
fn test_southward_extension_continues_spacing() {
    let sose = weddell_sose();
    let lat = &sose.coords.lat_1d;
    let native_first = lat[WEDDELL_J_EXTEND];
    assert_eq!(native_first, -77.5);
    for m in 0..WEDDELL_J_EXTEND {
        assert!(lat[m] < lat[m + 1]);
        assert_eq!(lat[m + 1] - lat[m], 1.0);
    }
}

#[test]
fn test_explicit_lat_resolution() {
    let options = SoseOptions {
        split: Split::Antimeridian,
        lat_resolution: Some(0.5),
    };
    let sose = SoseGrid::aligned(sose_source(), &weddell_target(), options).unwrap();
    // 2.5 degrees south at 0.5 degree spacing
    assert_eq!(sose.reindex().unwrap().y.start_after, 5);
    assert_all_approx_eq!(
        sose.coords.lat_1d.slice(s![..6]).to_vec(),
        vec![-80.0, -79.5, -79.0, -78.5, -78.0, -77.5],
        1e-12
    );
}

#[test]
fn test_extended_cells_are_land() {
    let sose = weddell_sose();
    let land = &sose.land_mask.t;
    // Extended rows and the two native land rows
    for j in 0..WEDDELL_J_EXTEND + 2 {
        assert!(land.row(j).iter().all(|&l| l));
    }
    assert!(land.row(WEDDELL_J_EXTEND + 2).iter().all(|&l| !l));
    // Synthetic deep level is dry
    assert!(sose.hfac.t.index_axis(ndarray::Axis(0), 5).iter().all(|&h| h == 0.0));
}

// =============================================================================
// Field reads
// =============================================================================

#[test]
fn test_read_field_reindexes_3d() {
    let sose = weddell_sose();
    let theta = sose.read_field("THETA", FieldDims::Xyz, -999.0).unwrap();
    assert_eq!(theta.shape(), &[6, 12, 52]);

    for (k, jj, ii) in [(0, 0, 0), (2, 4, 7), (4, 8, 51)] {
        let expected = k as f64 * 1e6 + jj as f64 * 1e3 + (WEDDELL_I0_NATIVE + ii) as f64;
        assert_eq!(theta[[k, WEDDELL_J_EXTEND + jj, ii]], expected);
    }
    // Filled, not extrapolated
    assert_eq!(theta[[0, 0, 0]], -999.0);
    assert_eq!(theta[[5, 6, 6]], -999.0);
}

#[test]
fn test_read_field_idempotent() {
    let sose = weddell_sose();
    let a = sose.read_field("THETA.data", FieldDims::Xyz, 0.0).unwrap();
    let b = sose.read_field("THETA", FieldDims::Xyz, 0.0).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_read_time_dependent_field() {
    let sose = weddell_sose();
    let sea_ice = sose.read_field("SIarea", FieldDims::Xyt, 0.0).unwrap();
    assert_eq!(sea_ice.shape(), &[3, 12, 52]);
    assert_eq!(sea_ice[[2, WEDDELL_J_EXTEND, 0]], 2e6 + WEDDELL_I0_NATIVE as f64);
}

#[test]
fn test_single_record_gains_time_axis() {
    let sose = weddell_sose();
    let eta = sose.read_field("ETAN", FieldDims::Xyt, 0.0).unwrap();
    assert_eq!(eta.shape(), &[1, 12, 52]);
    let eta = sose.read_field("ETAN", FieldDims::Xy, 0.0).unwrap();
    assert_eq!(eta.shape(), &[12, 52]);
}

#[test]
fn test_field_dims_mismatch() {
    let sose = weddell_sose();
    let err = sose.read_field("ETAN", FieldDims::Xyz, 0.0).unwrap_err();
    assert!(matches!(err, GridError::ShapeMismatch { .. }));
}

#[test]
fn test_missing_field_is_load_error() {
    let sose = weddell_sose();
    let err = sose.read_field("SALT", FieldDims::Xyz, 0.0).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Load);
}

// =============================================================================
// Splits and bounds
// =============================================================================

#[test]
fn test_split_zero_rejects_western_target() {
    let result = SoseGrid::aligned(sose_source(), &weddell_target(), SoseOptions::default());
    assert!(matches!(result, Err(GridError::SplitMismatch(_))));
}

#[test]
fn test_split_zero_trims_every_side() {
    let target = SyntheticGrid::regular((10.5, 1.0, 20), (-60.5, 1.0, 10), vec![10.0, 20.0]);
    let target = Grid::from_source(&target.to_memory_source(), &GridOptions::default()).unwrap();
    let sose = SoseGrid::aligned(sose_source(), &target, SoseOptions::default()).unwrap();

    let reindex = sose.reindex().unwrap();
    assert_eq!(reindex.i_split, 0);
    assert_eq!(reindex.x.source_range(), 9..31);
    assert_eq!(reindex.y.source_range(), 16..28);
    assert_eq!(reindex.y.start_after, 0);
    assert_eq!(reindex.z.source_range(), 0..3);
    assert_eq!(sose.coords.lon_1d[0], 9.5);
    assert_eq!(sose.coords.lat_1d[0], -61.5);
    assert_eq!(sose.z.to_vec(), vec![-5.0, -20.0, -50.0]);

    let theta = sose.read_field("THETA", FieldDims::Xyz, 0.0).unwrap();
    assert_eq!(theta[[1, 0, 0]], 1e6 + 16e3 + 9.0);
}

#[test]
fn test_northward_extension_disallowed() {
    let target = SyntheticGrid::regular((10.5, 1.0, 5), (-40.5, 1.0, 20), vec![10.0]);
    let target = Grid::from_source(&target.to_memory_source(), &GridOptions::default()).unwrap();
    let result = SoseGrid::aligned(sose_source(), &target, SoseOptions::default());
    assert!(matches!(
        result,
        Err(GridError::DisallowedExtension(Direction::North))
    ));
}

#[test]
fn test_surface_level_added_for_shallower_target() {
    let target = SyntheticGrid::regular((10.5, 1.0, 5), (-60.5, 1.0, 5), vec![2.0, 6.0]);
    let target = Grid::from_source(&target.to_memory_source(), &GridOptions::default()).unwrap();
    let sose = SoseGrid::aligned(sose_source(), &target, SoseOptions::default()).unwrap();
    // Target centres -1 and -5: one level at 0, then SOSE down to the
    // first level below -5
    assert_eq!(sose.z.to_vec(), vec![0.0, -5.0, -20.0]);
    let theta = sose.read_field("THETA", FieldDims::Xyz, f64::NAN).unwrap();
    assert!(theta.index_axis(ndarray::Axis(0), 0).iter().all(|v| v.is_nan()));
}

// =============================================================================
// Native grid and MDS sources
// =============================================================================

#[test]
fn test_native_grid_unchanged() {
    let sose = SoseGrid::native(sose_source()).unwrap();
    assert!(!sose.trim_extend());
    assert_eq!((sose.nx(), sose.ny(), sose.nz()), (360, 48, 5));
    assert_eq!(sose.coords.lon_1d[0], 0.5);
    assert_eq!(sose.coords.lon_corners_1d[0], 0.0);
    assert_eq!(sose.coords.lon_1d[359], 359.5);

    let theta = sose.read_field("THETA", FieldDims::Xyz, 0.0).unwrap();
    assert_eq!(theta.shape(), &[5, 48, 360]);
}

#[test]
fn test_open_aligned_from_mds_directory() {
    let sose = sose_like_global();
    let dir = temp_grid_dir();
    sose.write_mds_dir(dir.path(), Precision::Float32).unwrap();
    let theta = index_field(sose.nz(), sose.ny(), sose.nx());
    write_mds(dir.path(), "THETA", theta.view().into_dyn(), Precision::Float32).unwrap();
    let records = Array3::<f64>::zeros((2, sose.ny(), sose.nx()));
    write_mds_records(dir.path(), "SIarea", records.view().into_dyn(), Precision::Float32).unwrap();

    let aligned = SoseGrid::open_aligned(
        dir.path(),
        &weddell_target(),
        SoseOptions::with_split(Split::Antimeridian),
    )
    .unwrap();
    assert_eq!((aligned.nx, aligned.ny, aligned.nz), (52, 12, 6));

    let theta = aligned.read_field("THETA.data", FieldDims::Xyz, 0.0).unwrap();
    assert_eq!(theta[[1, WEDDELL_J_EXTEND, 0]], 1e6 + WEDDELL_I0_NATIVE as f64);
    let sea_ice = aligned.read_field("SIarea", FieldDims::Xyt, 1.0).unwrap();
    assert_eq!(sea_ice.shape(), &[2, 12, 52]);
}

#[test]
fn test_sose_has_land_but_no_ice_capability() {
    let sose = weddell_sose();
    let land = sose.get_land_mask(grid_common::GridType::U).unwrap();
    assert_eq!(land.dim(), (12, 52));
}
