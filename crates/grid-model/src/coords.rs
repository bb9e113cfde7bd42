//! Horizontal coordinates on the staggered grid.

use grid_common::{AxisDim, GridError, GridResult, GridType, LonRange, SubGrid};
use ndarray::{concatenate, Array, Array1, Array2, ArrayView, ArrayView1, ArrayView2, Axis, RemoveAxis};

/// Longitude and latitude at cell centres and cell corners.
///
/// The 1D axes are only meaningful for a separable lat/lon grid, which is
/// the only kind of grid that can be built.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lon_1d: Array1<f64>,
    pub lat_1d: Array1<f64>,
    pub lon_corners_1d: Array1<f64>,
    pub lat_corners_1d: Array1<f64>,
    /// Longitude at cell centres, `[ny, nx]`
    pub lon_2d: Array2<f64>,
    /// Latitude at cell centres, `[ny, nx]`
    pub lat_2d: Array2<f64>,
    /// Longitude at cell corners, `[ny, nx]`
    pub lon_corners_2d: Array2<f64>,
    /// Latitude at cell corners, `[ny, nx]`
    pub lat_corners_2d: Array2<f64>,
}

impl Coordinates {
    /// Build from 1D axes, meshing them into 2D arrays.
    pub fn from_axes(
        lon: Array1<f64>,
        lat: Array1<f64>,
        lon_corners: Array1<f64>,
        lat_corners: Array1<f64>,
    ) -> Self {
        let (lon_2d, lat_2d) = meshgrid(&lon, &lat);
        let (lon_corners_2d, lat_corners_2d) = meshgrid(&lon_corners, &lat_corners);
        Self {
            lon_1d: lon,
            lat_1d: lat,
            lon_corners_1d: lon_corners,
            lat_corners_1d: lat_corners,
            lon_2d,
            lat_2d,
            lon_corners_2d,
            lat_corners_2d,
        }
    }

    pub fn nx(&self) -> usize {
        self.lon_1d.len()
    }

    pub fn ny(&self) -> usize {
        self.lat_1d.len()
    }

    /// Fold every longitude array into `range`.
    pub fn normalize_longitude(&mut self, range: LonRange) {
        for lon in [&mut self.lon_1d, &mut self.lon_corners_1d] {
            lon.mapv_inplace(|v| range.wrap(v));
        }
        for lon in [&mut self.lon_2d, &mut self.lon_corners_2d] {
            lon.mapv_inplace(|v| range.wrap(v));
        }
    }

    /// 1D axes for a grid-point type.
    pub fn lon_lat_1d(&self, gtype: GridType) -> (ArrayView1<'_, f64>, ArrayView1<'_, f64>) {
        let lon = if gtype.lon_on_corners() {
            &self.lon_corners_1d
        } else {
            &self.lon_1d
        };
        let lat = if gtype.lat_on_corners() {
            &self.lat_corners_1d
        } else {
            &self.lat_1d
        };
        (lon.view(), lat.view())
    }

    /// 2D meshes for a grid-point type.
    pub fn lon_lat_2d(&self, gtype: GridType) -> (ArrayView2<'_, f64>, ArrayView2<'_, f64>) {
        let lon = if gtype.lon_on_corners() {
            &self.lon_corners_2d
        } else {
            &self.lon_2d
        };
        let lat = if gtype.lat_on_corners() {
            &self.lat_corners_2d
        } else {
            &self.lat_2d
        };
        (lon.view(), lat.view())
    }

    /// Coordinates for a grid-point type at the requested resolution.
    pub fn lon_lat(&self, gtype: GridType, dim: AxisDim) -> LonLat<'_> {
        match dim {
            AxisDim::One => {
                let (lon, lat) = self.lon_lat_1d(gtype);
                LonLat::OneD { lon, lat }
            }
            AxisDim::Two => {
                let (lon, lat) = self.lon_lat_2d(gtype);
                LonLat::TwoD { lon, lat }
            }
        }
    }
}

fn meshgrid(x: &Array1<f64>, y: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (y.len(), x.len());
    (
        Array2::from_shape_fn(shape, |(_, i)| x[i]),
        Array2::from_shape_fn(shape, |(j, _)| y[j]),
    )
}

/// A longitude/latitude pair as returned by `get_lon_lat`.
#[derive(Debug, Clone)]
pub enum LonLat<'a> {
    OneD {
        lon: ArrayView1<'a, f64>,
        lat: ArrayView1<'a, f64>,
    },
    TwoD {
        lon: ArrayView2<'a, f64>,
        lat: ArrayView2<'a, f64>,
    },
}

impl<'a> LonLat<'a> {
    pub fn dim(&self) -> AxisDim {
        match self {
            Self::OneD { .. } => AxisDim::One,
            Self::TwoD { .. } => AxisDim::Two,
        }
    }

    pub fn into_1d(self) -> GridResult<(ArrayView1<'a, f64>, ArrayView1<'a, f64>)> {
        match self {
            Self::OneD { lon, lat } => Ok((lon, lat)),
            Self::TwoD { .. } => Err(GridError::InvalidDim(2)),
        }
    }

    pub fn into_2d(self) -> GridResult<(ArrayView2<'a, f64>, ArrayView2<'a, f64>)> {
        match self {
            Self::TwoD { lon, lat } => Ok((lon, lat)),
            Self::OneD { .. } => Err(GridError::InvalidDim(1)),
        }
    }
}

/// One value per hfac-carrying sub-grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PerSubGrid<T> {
    pub t: T,
    pub u: T,
    pub v: T,
}

impl<T> PerSubGrid<T> {
    /// Build each entry with `f`, stopping at the first error.
    pub fn try_build<F>(mut f: F) -> GridResult<Self>
    where
        F: FnMut(SubGrid) -> GridResult<T>,
    {
        Ok(Self {
            t: f(SubGrid::T)?,
            u: f(SubGrid::U)?,
            v: f(SubGrid::V)?,
        })
    }

    pub fn get(&self, sub: SubGrid) -> &T {
        match sub {
            SubGrid::T => &self.t,
            SubGrid::U => &self.u,
            SubGrid::V => &self.v,
        }
    }

    /// Apply `f` to every entry, with its sub-grid.
    pub fn map<U, F>(&self, mut f: F) -> PerSubGrid<U>
    where
        F: FnMut(SubGrid, &T) -> U,
    {
        PerSubGrid {
            t: f(SubGrid::T, &self.t),
            u: f(SubGrid::U, &self.u),
            v: f(SubGrid::V, &self.v),
        }
    }
}

/// Resolve the sub-grid that carries `field` for a point type.
pub(crate) fn sub_grid_for(gtype: GridType, field: &'static str) -> GridResult<SubGrid> {
    gtype
        .sub_grid()
        .ok_or(GridError::NoSuchField { field, gtype })
}

/// Rotate an array along its last (longitude) axis so that index
/// `i_split` becomes index 0.
///
/// Rotation rather than interpolation: values are only moved.
pub fn split_longitude<A, D>(array: ArrayView<'_, A, D>, i_split: usize) -> GridResult<Array<A, D>>
where
    A: Clone,
    D: RemoveAxis,
{
    if array.ndim() == 0 {
        return Err(GridError::geometry("cannot split a scalar along longitude"));
    }
    let axis = Axis(array.ndim() - 1);
    let n = array.len_of(axis);
    if i_split > n {
        return Err(GridError::geometry(format!(
            "split index {} is past the end of a longitude axis of length {}",
            i_split, n
        )));
    }
    if i_split == 0 || i_split == n {
        return Ok(array.to_owned());
    }

    let east = array.slice_axis(axis, (i_split..).into());
    let west = array.slice_axis(axis, (..i_split).into());
    concatenate(axis, &[east, west]).map_err(|e| GridError::geometry(e.to_string()))
}

/// Largest absolute deviation of any row from row 0.
pub(crate) fn max_row_deviation(a: &ArrayView2<'_, f64>) -> f64 {
    if a.nrows() == 0 {
        return 0.0;
    }
    let first = a.row(0);
    a.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .zip(first.iter())
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f64::max)
        })
        .fold(0.0, f64::max)
}

/// Largest absolute deviation of any column from column 0.
pub(crate) fn max_column_deviation(a: &ArrayView2<'_, f64>) -> f64 {
    max_row_deviation(&a.t())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn coords() -> Coordinates {
        Coordinates::from_axes(
            array![-60.5, -59.5, -58.5],
            array![-80.25, -79.75],
            array![-61.0, -60.0, -59.0],
            array![-80.5, -80.0],
        )
    }

    #[test]
    fn test_meshes() {
        let c = coords();
        assert_eq!(c.lon_2d.shape(), &[2, 3]);
        assert_eq!(c.lon_2d[[1, 2]], -58.5);
        assert_eq!(c.lat_2d[[1, 2]], -79.75);
        assert_eq!(c.lat_corners_2d[[0, 1]], -80.5);
    }

    #[test]
    fn test_lon_lat_lookup() {
        let c = coords();
        let (lon, lat) = c.lon_lat_1d(GridType::U);
        assert_eq!(lon[0], -61.0);
        assert_eq!(lat[0], -80.25);

        let (lon, lat) = c.lon_lat_1d(GridType::V);
        assert_eq!(lon[0], -60.5);
        assert_eq!(lat[0], -80.5);

        let (lon, lat) = c.lon_lat_2d(GridType::Psi);
        assert_eq!(lon[[1, 0]], -61.0);
        assert_eq!(lat[[1, 0]], -80.0);

        // w shares horizontal location with t
        assert_eq!(c.lon_lat_2d(GridType::W), c.lon_lat_2d(GridType::T));
    }

    #[test]
    fn test_lon_lat_dim() {
        let c = coords();
        assert!(c.lon_lat(GridType::T, AxisDim::One).into_1d().is_ok());
        assert!(matches!(
            c.lon_lat(GridType::T, AxisDim::One).into_2d(),
            Err(GridError::InvalidDim(1))
        ));
    }

    #[test]
    fn test_split_longitude_1d() {
        let lon = array![10.0, 90.0, 170.0, -110.0, -30.0];
        let split = split_longitude(lon.view(), 3).unwrap();
        assert_eq!(split, array![-110.0, -30.0, 10.0, 90.0, 170.0]);
    }

    #[test]
    fn test_split_longitude_last_axis_only() {
        let field = Array3::from_shape_fn((2, 2, 4), |(k, j, i)| (k * 100 + j * 10 + i) as f64);
        let split = split_longitude(field.view(), 1).unwrap();
        assert_eq!(split[[1, 1, 0]], 111.0);
        assert_eq!(split[[1, 1, 3]], 110.0);
        assert_eq!(split[[0, 0, 2]], 3.0);
    }

    #[test]
    fn test_split_longitude_out_of_range() {
        let lon = array![1.0, 2.0];
        assert!(split_longitude(lon.view(), 3).is_err());
        assert_eq!(split_longitude(lon.view(), 0).unwrap(), lon);
    }

    #[test]
    fn test_row_deviation() {
        let c = coords();
        assert_eq!(max_row_deviation(&c.lon_2d.view()), 0.0);
        assert_eq!(max_column_deviation(&c.lat_2d.view()), 0.0);
        assert!(max_row_deviation(&c.lat_2d.view()) > 0.0);
    }
}
