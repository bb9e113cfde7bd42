//! Moving fields between staggered point types, and field masking.
//!
//! Fields are `[time?, depth?, ny, nx]`. Masked points are set to NaN,
//! so a midpoint touching a masked point is itself masked.

use grid_common::{GridError, GridResult, GridType};
use ndarray::{Array2, ArrayD, ArrayView, Axis, Dimension, Slice, Zip};

use crate::traits::{IceShelfGrid, StaggeredGrid};

/// Set `data` to NaN wherever `mask` is true, broadcasting over leading
/// axes.
fn apply_mask<D: Dimension>(
    mut data: ArrayD<f64>,
    mask: ArrayView<'_, bool, D>,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    let expected_rank = mask.ndim() + usize::from(time_dependent);
    let mismatch = |data: &ArrayD<f64>| {
        let mut expected = Vec::with_capacity(expected_rank);
        if time_dependent {
            expected.push(data.shape().first().copied().unwrap_or(0));
        }
        expected.extend_from_slice(mask.shape());
        GridError::ShapeMismatch {
            variable: "field".to_string(),
            expected,
            found: data.shape().to_vec(),
        }
    };
    if data.ndim() != expected_rank {
        return Err(mismatch(&data));
    }

    let Some(mask) = mask.broadcast(data.raw_dim()) else {
        return Err(mismatch(&data));
    };
    Zip::from(&mut data).and(&mask).for_each(|v, &masked| {
        if masked {
            *v = f64::NAN;
        }
    });
    Ok(data)
}

/// Mask land points of a 2D field.
pub fn mask_land<G: StaggeredGrid + ?Sized>(
    data: ArrayD<f64>,
    grid: &G,
    gtype: GridType,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    apply_mask(data, grid.get_land_mask(gtype)?, time_dependent)
}

/// Mask land and ice shelf points of a 2D field.
pub fn mask_land_ice<G: IceShelfGrid + ?Sized>(
    data: ArrayD<f64>,
    grid: &G,
    gtype: GridType,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    let land = grid.get_land_mask(gtype)?;
    let ice = grid.get_ice_mask(gtype)?;
    let mask: Array2<bool> = Zip::from(&land)
        .and(&ice)
        .map_collect(|&land, &ice| land || ice);
    apply_mask(data, mask.view(), time_dependent)
}

/// Mask dry cells (hfac == 0) of a 3D field.
pub fn mask_3d<G: StaggeredGrid + ?Sized>(
    data: ArrayD<f64>,
    grid: &G,
    gtype: GridType,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    let dry = grid.get_hfac(gtype)?.mapv(|h| h == 0.0);
    apply_mask(data, dry.view(), time_dependent)
}

fn is_depth_dependent(data: &ArrayD<f64>, time_dependent: bool) -> bool {
    data.ndim() == 3 + usize::from(time_dependent)
}

/// Interpolate a field from one point type to another.
///
/// Only u to t (x midpoints) and v to t (y midpoints) are supported. The
/// easternmost column (u) or northernmost row (v) is copied across. The
/// input is masked on its own grid and the output on the target grid:
/// hfac for depth-dependent fields, the land mask otherwise.
pub fn interp_grid<G: StaggeredGrid + ?Sized>(
    data: ArrayD<f64>,
    grid: &G,
    from: GridType,
    to: GridType,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    if is_depth_dependent(&data, time_dependent) {
        interp_masked(data, from, to, |d, g| mask_3d(d, grid, g, time_dependent))
    } else {
        interp_masked(data, from, to, |d, g| mask_land(d, grid, g, time_dependent))
    }
}

/// Like [`interp_grid`], masking ice shelves as well as land.
///
/// Only valid for fields without depth.
pub fn interp_grid_mask_shelf<G: IceShelfGrid + ?Sized>(
    data: ArrayD<f64>,
    grid: &G,
    from: GridType,
    to: GridType,
    time_dependent: bool,
) -> GridResult<ArrayD<f64>> {
    if is_depth_dependent(&data, time_dependent) {
        return Err(GridError::Unsupported(
            "ice shelf masking is only available for fields without depth".to_string(),
        ));
    }
    interp_masked(data, from, to, |d, g| {
        mask_land_ice(d, grid, g, time_dependent)
    })
}

fn interp_masked<F>(data: ArrayD<f64>, from: GridType, to: GridType, mask: F) -> GridResult<ArrayD<f64>>
where
    F: Fn(ArrayD<f64>, GridType) -> GridResult<ArrayD<f64>>,
{
    if data.ndim() < 2 {
        return Err(GridError::ShapeMismatch {
            variable: "field".to_string(),
            expected: vec![0, 0],
            found: data.shape().to_vec(),
        });
    }
    let axis = match (from, to) {
        (GridType::U, GridType::T) => Axis(data.ndim() - 1),
        (GridType::V, GridType::T) => Axis(data.ndim() - 2),
        _ => return Err(GridError::UnsupportedInterpolation { from, to }),
    };

    let data = mask(data, from)?;
    mask(midpoints(&data, axis), to)
}

/// Average neighbours along `axis`, keeping the last slice as is.
fn midpoints(data: &ArrayD<f64>, axis: Axis) -> ArrayD<f64> {
    let n = data.len_of(axis);
    let mut out = data.clone();
    if n < 2 {
        return out;
    }
    let lower = data.slice_axis(axis, Slice::from(..n - 1));
    let upper = data.slice_axis(axis, Slice::from(1..));
    out.slice_axis_mut(axis, Slice::from(..n - 1))
        .assign(&((&lower + &upper) * 0.5));
    out
}
