//! The SOSE reanalysis grid, aligned with a model grid.
//!
//! SOSE is a global 1/6 degree product split at 0E and covering the
//! Southern Ocean. To operate on SOSE fields array-to-array with a model
//! grid, the SOSE raster is re-indexed so that its index space covers the
//! model domain cell for cell:
//!
//! ```text
//!   source axis  |----trim----|==========kept==========|--trim--|
//!                0        start_before              end_before  n
//!
//!   new axis     |-extend-|==========kept==========|-extend-|
//!                0   start_after              end_after   len
//! ```
//!
//! Longitude may only be trimmed (SOSE is global). Latitude may be trimmed
//! at both ends and extended southwards. Depth may be trimmed at the deep
//! end and extended by one level at either end. Extended cells are filled
//! with a placeholder, never extrapolated.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use grid_common::longitude::is_strictly_increasing;
use grid_common::{Direction, GridError, GridResult, LonRange, Split};
use grid_reader::{open_source, squeeze_1d, GridVariable, RawGridSource};
use ndarray::{Array1, Array2, Array3, ArrayD, ArrayView1, Axis, IxDyn, Slice};
use tracing::{debug, info};

use crate::coords::{split_longitude, Coordinates, PerSubGrid};
use crate::grid::{hfac_variable, lat_axis, lon_axis, read_3d};
use crate::masks;
use crate::options::SoseOptions;
use crate::traits::StaggeredGrid;

/// Index bookkeeping for one axis of the re-indexed raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisWindow {
    /// First source index kept; the number of cells trimmed at the start.
    pub start_before: usize,
    /// One past the last source index kept.
    pub end_before: usize,
    /// Position of `start_before` on the new axis; the number of cells
    /// added at the start.
    pub start_after: usize,
    /// Length of the new axis.
    pub len: usize,
}

impl AxisWindow {
    /// Keep every source cell, add nothing.
    pub fn identity(n: usize) -> Self {
        Self {
            start_before: 0,
            end_before: n,
            start_after: 0,
            len: n,
        }
    }

    /// Position of `end_before` on the new axis.
    pub fn end_after(&self) -> usize {
        self.end_before - self.start_before + self.start_after
    }

    pub fn source_range(&self) -> Range<usize> {
        self.start_before..self.end_before
    }

    pub fn target_range(&self) -> Range<usize> {
        self.start_after..self.end_after()
    }

    /// Cells added at the end of the new axis.
    pub fn extended_end(&self) -> usize {
        self.len - self.end_after()
    }
}

/// Dimensions of a field read through the alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDims {
    Xy,
    Xyt,
    Xyz,
    Xyzt,
}

impl FieldDims {
    pub fn has_depth(&self) -> bool {
        matches!(self, Self::Xyz | Self::Xyzt)
    }

    pub fn has_time(&self) -> bool {
        matches!(self, Self::Xyt | Self::Xyzt)
    }

    pub fn rank(&self) -> usize {
        2 + self.has_depth() as usize + self.has_time() as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xy => "xy",
            Self::Xyt => "xyt",
            Self::Xyz => "xyz",
            Self::Xyzt => "xyzt",
        }
    }
}

impl fmt::Display for FieldDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldDims {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xy" => Ok(Self::Xy),
            "xyt" => Ok(Self::Xyt),
            "xyz" => Ok(Self::Xyz),
            "xyzt" => Ok(Self::Xyzt),
            _ => Err(GridError::InvalidFieldDims(s.to_string())),
        }
    }
}

/// Native 1D axes of the source, after longitude normalization and
/// splitting.
#[derive(Debug, Clone)]
struct NativeAxes {
    lon: Array1<f64>,
    lon_corners: Array1<f64>,
    lat: Array1<f64>,
    lat_corners: Array1<f64>,
    z: Array1<f64>,
}

/// The six bounds of a target domain.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TargetBounds {
    /// Westernmost corner longitude
    xmin: f64,
    /// Easternmost centre longitude
    xmax: f64,
    /// Southernmost corner latitude
    ymin: f64,
    /// Northernmost centre latitude
    ymax: f64,
    /// Shallowest cell centre
    z_shallow: f64,
    /// Deepest cell centre
    z_deep: f64,
    /// Synthetic level placed below the target's deepest centre
    z_below: f64,
}

impl TargetBounds {
    fn of<G: StaggeredGrid + ?Sized>(target: &G, native_z: &Array1<f64>) -> GridResult<Self> {
        let coords = target.coordinates();
        let z = target.z();
        let n = z.len();
        if n == 0 {
            return Err(GridError::geometry("target grid has no depth levels"));
        }
        let z_deep = z[n - 1];
        let z_below = if n >= 2 {
            2.0 * z_deep - z[n - 2]
        } else {
            z_deep - last_spacing(native_z.view())
        };
        Ok(Self {
            xmin: min_of(coords.lon_corners_2d.iter()),
            xmax: max_of(coords.lon_2d.iter()),
            ymin: min_of(coords.lat_corners_2d.iter()),
            ymax: max_of(coords.lat_2d.iter()),
            z_shallow: z[0],
            z_deep,
            z_below,
        })
    }
}

fn last_spacing(z: ArrayView1<'_, f64>) -> f64 {
    let n = z.len();
    if n >= 2 {
        (z[n - 2] - z[n - 1]).abs()
    } else {
        1.0
    }
}

fn min_of<'a, I: Iterator<Item = &'a f64>>(values: I) -> f64 {
    values
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min)
}

fn max_of<'a, I: Iterator<Item = &'a f64>>(values: I) -> f64 {
    values
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NEG_INFINITY, f64::max)
}

fn first_index<F: Fn(f64) -> bool>(axis: &Array1<f64>, pred: F) -> Option<usize> {
    axis.iter().position(|&v| pred(v))
}

/// Result of aligning the native axes with a target domain.
#[derive(Debug, Clone)]
struct Alignment {
    x: AxisWindow,
    y: AxisWindow,
    z: AxisWindow,
    axes: NativeAxes,
}

/// Compute trim/extend windows and the new axes.
fn align_axes(native: &NativeAxes, bounds: &TargetBounds, lat_res: f64) -> GridResult<Alignment> {
    let nx = native.lon.len();
    let ny = native.lat.len();
    let nz = native.z.len();
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(GridError::geometry("source grid has an empty axis"));
    }

    // West: centre longitudes, so every point type clears the bound
    let lon0 = native.lon[0];
    let i0_before = if bounds.xmin == lon0 {
        0
    } else if bounds.xmin > lon0 {
        first_index(&native.lon, |v| v > bounds.xmin)
            .map(|i| i - 1)
            .ok_or(GridError::BoundNotCleared(Direction::West))?
    } else {
        return Err(GridError::DisallowedExtension(Direction::West));
    };

    // East: corner longitudes (western cell edges)
    let lon_corner_last = native.lon_corners[nx - 1];
    let i1_before = if bounds.xmax == lon_corner_last {
        nx
    } else if bounds.xmax < lon_corner_last {
        first_index(&native.lon_corners, |v| v > bounds.xmax)
            .map_or(nx, |i| (i + 1).min(nx))
    } else {
        return Err(GridError::DisallowedExtension(Direction::East));
    };
    if i1_before <= i0_before {
        return Err(GridError::geometry(format!(
            "empty longitude window {}..{}",
            i0_before, i1_before
        )));
    }
    let x = AxisWindow {
        start_before: i0_before,
        end_before: i1_before,
        start_after: 0,
        len: i1_before - i0_before,
    };

    // South: trim, or extend at the native resolution
    let lat0 = native.lat[0];
    let (j0_before, j0_after) = if bounds.ymin == lat0 {
        (0, 0)
    } else if bounds.ymin > lat0 {
        let j = first_index(&native.lat, |v| v > bounds.ymin)
            .map(|j| j - 1)
            .ok_or(GridError::BoundNotCleared(Direction::South))?;
        (j, 0)
    } else {
        (0, ((lat0 - bounds.ymin) / lat_res).ceil() as usize)
    };

    // North: corner latitudes (southern cell edges)
    let lat_corner_last = native.lat_corners[ny - 1];
    let j1_before = if bounds.ymax == lat_corner_last {
        ny
    } else if bounds.ymax < lat_corner_last {
        first_index(&native.lat_corners, |v| v > bounds.ymax)
            .map_or(ny, |j| (j + 1).min(ny))
    } else {
        return Err(GridError::DisallowedExtension(Direction::North));
    };
    if j1_before <= j0_before {
        return Err(GridError::geometry(format!(
            "empty latitude window {}..{}",
            j0_before, j1_before
        )));
    }
    let y = AxisWindow {
        start_before: j0_before,
        end_before: j1_before,
        start_after: j0_after,
        len: j1_before - j0_before + j0_after,
    };

    // Depth: one synthetic level at either end, trim only at depth
    let z_last = native.z[nz - 1];
    let k0_after = usize::from(bounds.z_shallow > native.z[0]);
    let k1_before = if bounds.z_deep > z_last {
        first_index(&native.z, |v| v < bounds.z_deep).map_or(nz, |k| (k + 1).min(nz))
    } else {
        nz
    };
    let k1_after = k1_before + k0_after;
    let z = AxisWindow {
        start_before: 0,
        end_before: k1_before,
        start_after: k0_after,
        len: k1_after + usize::from(bounds.z_deep < z_last),
    };

    let axes = NativeAxes {
        lon: native.lon.slice(ndarray::s![x.source_range()]).to_owned(),
        lon_corners: native.lon_corners.slice(ndarray::s![x.source_range()]).to_owned(),
        lat: extend_south(&native.lat, &y, lat_res),
        lat_corners: extend_south(&native.lat_corners, &y, lat_res),
        z: {
            let mut axis = Vec::with_capacity(z.len);
            axis.extend(std::iter::repeat(0.0).take(z.start_after));
            axis.extend(native.z.slice(ndarray::s![z.source_range()]).iter().copied());
            axis.extend(std::iter::repeat(bounds.z_below).take(z.extended_end()));
            Array1::from(axis)
        },
    };

    let alignment = Alignment { x, y, z, axes };
    alignment.check_covers(bounds)?;
    Ok(alignment)
}

/// Trimmed axis with `window.start_after` evenly spaced values prepended.
fn extend_south(axis: &Array1<f64>, window: &AxisWindow, res: f64) -> Array1<f64> {
    let first = axis[window.start_before];
    let n_extend = window.start_after;
    (0..n_extend)
        .map(|m| first - (n_extend - m) as f64 * res)
        .chain(axis.slice(ndarray::s![window.source_range()]).iter().copied())
        .collect()
}

impl Alignment {
    fn check_covers(&self, bounds: &TargetBounds) -> GridResult<()> {
        let a = &self.axes;
        let checks = [
            (a.lon_corners[0] <= bounds.xmin, Direction::West),
            (a.lon_corners[a.lon_corners.len() - 1] >= bounds.xmax, Direction::East),
            (a.lat_corners[0] <= bounds.ymin, Direction::South),
            (a.lat_corners[a.lat_corners.len() - 1] >= bounds.ymax, Direction::North),
            (a.z[0] >= bounds.z_shallow, Direction::Shallow),
            (a.z[a.z.len() - 1] <= bounds.z_deep, Direction::Deep),
        ];
        for (cleared, direction) in checks {
            if !cleared {
                return Err(GridError::BoundNotCleared(direction));
            }
        }
        Ok(())
    }
}

/// The re-indexing applied to every field read from an aligned SOSE grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reindex {
    /// Source longitude index moved to position 0 by the split.
    pub i_split: usize,
    pub x: AxisWindow,
    pub y: AxisWindow,
    pub z: AxisWindow,
    /// `(nx, ny, nz)` of the source.
    pub native_dims: (usize, usize, usize),
}

impl Reindex {
    /// Split, trim and extend one field.
    ///
    /// Extended cells hold `fill_value`.
    pub fn apply(
        &self,
        raw: ArrayD<f64>,
        dims: FieldDims,
        fill_value: f64,
        name: &str,
    ) -> GridResult<ArrayD<f64>> {
        // A single record comes back without its time axis
        let raw = if dims.has_time() && raw.ndim() + 1 == dims.rank() {
            raw.insert_axis(Axis(0))
        } else {
            raw
        };

        let (nx_native, ny_native, nz_native) = self.native_dims;
        let mut windows: Vec<Option<AxisWindow>> = Vec::with_capacity(4);
        let mut expected: Vec<usize> = Vec::with_capacity(4);
        if dims.has_time() {
            windows.push(None);
            expected.push(raw.shape().first().copied().unwrap_or(0));
        }
        if dims.has_depth() {
            windows.push(Some(self.z));
            expected.push(nz_native);
        }
        windows.extend([Some(self.y), Some(self.x)]);
        expected.extend([ny_native, nx_native]);

        if raw.shape() != expected.as_slice() {
            return Err(GridError::ShapeMismatch {
                variable: name.to_string(),
                expected,
                found: raw.shape().to_vec(),
            });
        }

        let rotated = split_longitude(raw.view(), self.i_split)?;
        let shape: Vec<usize> = windows
            .iter()
            .zip(rotated.shape())
            .map(|(w, &n)| w.map_or(n, |w| w.len))
            .collect();

        let mut data = ArrayD::from_elem(IxDyn(&shape), fill_value);
        let kept = rotated.slice_each_axis(|ad| match windows[ad.axis.index()] {
            Some(w) => Slice::from(w.source_range()),
            None => Slice::from(..),
        });
        data.slice_each_axis_mut(|ad| match windows[ad.axis.index()] {
            Some(w) => Slice::from(w.target_range()),
            None => Slice::from(..),
        })
        .assign(&kept);

        debug!(name = name, dims = %dims, shape = ?shape, "Read aligned SOSE field");
        Ok(data)
    }
}

/// A SOSE grid, optionally re-indexed to cover a target grid.
///
/// Only land masks exist: SOSE has no ice shelf cavities, so this type
/// does not implement [`IceShelfGrid`](crate::IceShelfGrid).
#[derive(Debug, Clone)]
pub struct SoseGrid<S> {
    source: S,
    split: Split,
    reindex: Option<Reindex>,
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub coords: Coordinates,
    pub z: Array1<f64>,
    /// hFacC, hFacW and hFacS read through the alignment
    pub hfac: PerSubGrid<Array3<f64>>,
    pub land_mask: PerSubGrid<Array2<bool>>,
}

impl SoseGrid<Box<dyn RawGridSource>> {
    /// Open a SOSE grid directory and align it with `target`.
    pub fn open_aligned<P, G>(path: P, target: &G, options: SoseOptions) -> GridResult<Self>
    where
        P: AsRef<Path>,
        G: StaggeredGrid + ?Sized,
    {
        Self::aligned(open_source(path)?, target, options)
    }

    /// Open a SOSE grid directory without trimming or extending.
    pub fn open_native<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        Self::native(open_source(path)?)
    }
}

impl<S: RawGridSource> SoseGrid<S> {
    /// Build a SOSE grid whose index space covers `target`.
    pub fn aligned<G>(source: S, target: &G, options: SoseOptions) -> GridResult<Self>
    where
        G: StaggeredGrid + ?Sized,
    {
        options.validate()?;
        check_split(target, options.split)?;

        let range = options.split.lon_range();
        let (lon, _) = lon_axis(source.load(GridVariable::Xc)?, "XC")?;
        let lon = lon.mapv(|v| range.wrap(v));
        let i_split = match options.split {
            // Rotate so the axis starts at the first western longitude
            Split::Antimeridian => lon.iter().position(|&v| v < 0.0).unwrap_or(0),
            Split::Zero => 0,
        };
        let lon = split_longitude(lon.view(), i_split)?;
        let native = read_native_axes(&source, lon, i_split, range)?;

        let bounds = TargetBounds::of(target, &native.z)?;
        let lat_res = match options.lat_resolution {
            Some(res) => res,
            None if native.lat.len() >= 2 => native.lat[1] - native.lat[0],
            None => {
                return Err(GridError::InvalidConfig(
                    "lat_resolution is required for a source with a single latitude".to_string(),
                ))
            }
        };
        let Alignment { x, y, z, axes } = align_axes(&native, &bounds, lat_res)?;
        let reindex = Reindex {
            i_split,
            x,
            y,
            z,
            native_dims: (native.lon.len(), native.lat.len(), native.z.len()),
        };
        debug!(reindex = ?reindex, "SOSE alignment computed");

        let hfac = PerSubGrid::try_build(|sub| {
            let var = hfac_variable(sub);
            let name = var.name(source.kind());
            reindex
                .apply(source.load(var)?, FieldDims::Xyz, 0.0, name)?
                .into_dimensionality()
                .map_err(|e| GridError::geometry(format!("{}: {}", name, e)))
        })?;
        let land_mask = hfac.map(|_, h| masks::land_mask(h.view()));
        let coords = Coordinates::from_axes(axes.lon, axes.lat, axes.lon_corners, axes.lat_corners);

        info!(
            source = %source.describe(),
            split = %options.split,
            nx = x.len,
            ny = y.len,
            nz = z.len,
            "SOSE grid aligned"
        );

        Ok(Self {
            source,
            split: options.split,
            reindex: Some(reindex),
            nx: x.len,
            ny: y.len,
            nz: z.len,
            coords,
            z: axes.z,
            hfac,
            land_mask,
        })
    }

    /// Build a SOSE grid on its native index space, longitude in (0, 360].
    pub fn native(source: S) -> GridResult<Self> {
        let range = LonRange::Positive;
        let (lon, _) = lon_axis(source.load(GridVariable::Xc)?, "XC")?;
        let lon = lon.mapv(|v| range.wrap(v));
        let native = read_native_axes(&source, lon, 0, range)?;
        let (nx, ny, nz) = (native.lon.len(), native.lat.len(), native.z.len());

        let hfac = PerSubGrid::try_build(|sub| read_3d(&source, hfac_variable(sub), (nz, ny, nx)))?;
        let land_mask = hfac.map(|_, h| masks::land_mask(h.view()));
        let coords =
            Coordinates::from_axes(native.lon, native.lat, native.lon_corners, native.lat_corners);

        info!(source = %source.describe(), nx = nx, ny = ny, nz = nz, "SOSE grid loaded");

        Ok(Self {
            source,
            split: Split::Zero,
            reindex: None,
            nx,
            ny,
            nz,
            coords,
            z: native.z,
            hfac,
            land_mask,
        })
    }

    /// Whether fields are trimmed and extended on read.
    pub fn trim_extend(&self) -> bool {
        self.reindex.is_some()
    }

    /// The re-indexing, when aligned with a target grid.
    pub fn reindex(&self) -> Option<&Reindex> {
        self.reindex.as_ref()
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read a field through the alignment.
    ///
    /// A trailing `.data` on the name is ignored. Without a target grid
    /// the field is returned as stored.
    pub fn read_field(&self, name: &str, dims: FieldDims, fill_value: f64) -> GridResult<ArrayD<f64>> {
        let name = name.strip_suffix(".data").unwrap_or(name);
        let raw = self.source.load_field(name)?;
        match &self.reindex {
            Some(reindex) => reindex.apply(raw, dims, fill_value, name),
            None => Ok(raw),
        }
    }
}

impl<S> StaggeredGrid for SoseGrid<S> {
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

/// The target's longitudes must lie in the range the split implies.
fn check_split<G: StaggeredGrid + ?Sized>(target: &G, split: Split) -> GridResult<()> {
    let lon = &target.coordinates().lon_2d;
    match split {
        Split::Antimeridian => {
            let max = max_of(lon.iter());
            if max > 180.0 {
                return Err(GridError::SplitMismatch(format!(
                    "split=180 does not match the target grid, whose longitude reaches {}",
                    max
                )));
            }
        }
        Split::Zero => {
            let min = min_of(lon.iter());
            if min < 0.0 {
                return Err(GridError::SplitMismatch(format!(
                    "split=0 does not match the target grid, whose longitude reaches {}",
                    min
                )));
            }
        }
    }
    Ok(())
}

/// Remaining native axes once the centre longitude is known.
fn read_native_axes<S>(source: &S, lon: Array1<f64>, i_split: usize, range: LonRange) -> GridResult<NativeAxes>
where
    S: RawGridSource + ?Sized,
{
    let (lon_corners, _) = lon_axis(source.load(GridVariable::Xg)?, "XG")?;
    let lon_corners = lon_corners.mapv(|v| range.wrap(v));
    let mut lon_corners = split_longitude(lon_corners.view(), i_split)?;
    // The seam falls between the first corner and the first centre
    if lon_corners.len() > 1 && lon_corners[0] > lon_corners[1] {
        lon_corners[0] -= 360.0;
    }

    if !is_strictly_increasing(lon.iter().copied())
        || !is_strictly_increasing(lon_corners.iter().copied())
    {
        return Err(GridError::NonMonotonicLongitude {
            max_lon: range.max_lon(),
        });
    }

    let (lat, _) = lat_axis(source.load(GridVariable::Yc)?, "YC")?;
    let (lat_corners, _) = lat_axis(source.load(GridVariable::Yg)?, "YG")?;
    let rc_name = GridVariable::Rc.name(source.kind());
    let z = squeeze_1d(source.load(GridVariable::Rc)?, rc_name)
        .map_err(|e| e.into_load_error(rc_name, &source.describe()))?;

    for (name, axis, expected) in [
        ("XG", &lon_corners, lon.len()),
        ("YG", &lat_corners, lat.len()),
    ] {
        if axis.len() != expected {
            return Err(GridError::ShapeMismatch {
                variable: name.to_string(),
                expected: vec![expected],
                found: vec![axis.len()],
            });
        }
    }

    Ok(NativeAxes {
        lon,
        lon_corners,
        lat,
        lat_corners,
        z,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn native() -> NativeAxes {
        NativeAxes {
            lon: array![0.5, 1.5, 2.5, 3.5, 4.5, 5.5],
            lon_corners: array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            lat: array![-77.5, -76.5, -75.5, -74.5, -73.5],
            lat_corners: array![-78.0, -77.0, -76.0, -75.0, -74.0],
            z: array![-5.0, -15.0, -25.0, -35.0],
        }
    }

    fn bounds() -> TargetBounds {
        TargetBounds {
            xmin: 1.8,
            xmax: 3.2,
            ymin: -76.2,
            ymax: -75.2,
            z_shallow: -5.0,
            z_deep: -35.0,
            z_below: -45.0,
        }
    }

    #[test]
    fn test_trim_horizontal() {
        let a = align_axes(&native(), &bounds(), 1.0).unwrap();
        // First centre east of 1.8 is index 2, keep one more to the west
        assert_eq!(a.x.start_before, 1);
        // First corner east of 3.2 is index 4, keep through index 4
        assert_eq!(a.x.end_before, 5);
        assert_eq!(a.axes.lon, array![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(a.y.source_range(), 1..4);
        assert_eq!(a.z, AxisWindow::identity(4));
    }

    #[test]
    fn test_extend_south() {
        let mut b = bounds();
        b.ymin = -80.0;
        let a = align_axes(&native(), &b, 1.0).unwrap();
        assert_eq!(a.y.start_before, 0);
        assert_eq!(a.y.start_after, 3);
        assert_eq!(a.axes.lat.slice(ndarray::s![..4]), array![-80.5, -79.5, -78.5, -77.5]);
        assert_eq!(a.axes.lat_corners[0], -81.0);
    }

    #[test]
    fn test_extend_depth_both_ends() {
        let mut b = bounds();
        b.z_shallow = -1.0;
        b.z_deep = -40.0;
        let a = align_axes(&native(), &b, 1.0).unwrap();
        assert_eq!(a.z.start_after, 1);
        assert_eq!(a.z.len, 6);
        assert_eq!(a.axes.z, array![0.0, -5.0, -15.0, -25.0, -35.0, -45.0]);
    }

    #[test]
    fn test_trim_depth() {
        let mut b = bounds();
        b.z_deep = -20.0;
        let a = align_axes(&native(), &b, 1.0).unwrap();
        // First centre deeper than -20 is index 2, keep it
        assert_eq!(a.z.end_before, 3);
        assert_eq!(a.axes.z, array![-5.0, -15.0, -25.0]);
    }

    #[test]
    fn test_disallowed_extensions() {
        let mut b = bounds();
        b.xmin = 0.0;
        assert!(matches!(
            align_axes(&native(), &b, 1.0),
            Err(GridError::DisallowedExtension(Direction::West))
        ));

        let mut b = bounds();
        b.xmax = 6.0;
        assert!(matches!(
            align_axes(&native(), &b, 1.0),
            Err(GridError::DisallowedExtension(Direction::East))
        ));

        let mut b = bounds();
        b.ymax = -73.0;
        assert!(matches!(
            align_axes(&native(), &b, 1.0),
            Err(GridError::DisallowedExtension(Direction::North))
        ));
    }

    #[test]
    fn test_field_dims() {
        assert_eq!("xyzt".parse::<FieldDims>().unwrap(), FieldDims::Xyzt);
        assert_eq!(FieldDims::Xyt.rank(), 3);
        assert!(matches!(
            "xz".parse::<FieldDims>(),
            Err(GridError::InvalidFieldDims(_))
        ));
    }
}
