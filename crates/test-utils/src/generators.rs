//! Synthetic MITgcm grids.
//!
//! [`SyntheticGrid`] holds 1D axes, layer thicknesses and the three hfac
//! arrays, and derives the remaining raw variables the way MITgcm lays
//! them out: corners half a cell west/south of centres, interfaces from
//! cumulative thicknesses, `Depth` from the tracer partial cells.

use std::path::Path;

use grid_reader::{write_mds, GridVariable, MemorySource, Precision, ReaderResult, SourceKind};
use ndarray::{s, Array1, Array2, Array3, ArrayD, Axis};

/// Metres per degree of latitude.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// A synthetic regular lat/lon grid with partial cells.
#[derive(Debug, Clone)]
pub struct SyntheticGrid {
    /// Centre longitudes
    pub lon: Array1<f64>,
    /// Centre latitudes
    pub lat: Array1<f64>,
    /// Layer thicknesses, top down
    pub dz: Array1<f64>,
    pub hfac_c: Array3<f64>,
    pub hfac_w: Array3<f64>,
    pub hfac_s: Array3<f64>,
    /// Water column thickness; derived from `hfac_c` when `None`
    pub depth: Option<Array2<f64>>,
    /// Write coordinates as 2D meshes instead of 1D axes
    pub mesh_coordinates: bool,
}

impl SyntheticGrid {
    /// An all-wet grid on the given axes.
    pub fn new(lon: Vec<f64>, lat: Vec<f64>, dz: Vec<f64>) -> Self {
        let shape = (dz.len(), lat.len(), lon.len());
        Self {
            lon: Array1::from(lon),
            lat: Array1::from(lat),
            dz: Array1::from(dz),
            hfac_c: Array3::ones(shape),
            hfac_w: Array3::ones(shape),
            hfac_s: Array3::ones(shape),
            depth: None,
            mesh_coordinates: false,
        }
    }

    /// An all-wet grid with evenly spaced axes starting at the given
    /// centres.
    pub fn regular(
        (lon0, dlon, nx): (f64, f64, usize),
        (lat0, dlat, ny): (f64, f64, usize),
        dz: Vec<f64>,
    ) -> Self {
        let lon = (0..nx).map(|i| lon0 + i as f64 * dlon).collect();
        let lat = (0..ny).map(|j| lat0 + j as f64 * dlat).collect();
        Self::new(lon, lat, dz)
    }

    pub fn nx(&self) -> usize {
        self.lon.len()
    }

    pub fn ny(&self) -> usize {
        self.lat.len()
    }

    pub fn nz(&self) -> usize {
        self.dz.len()
    }

    /// Set the same hfac column on all three sub-grids.
    pub fn set_column(&mut self, j: usize, i: usize, column: &[f64]) {
        let column = Array1::from(column.to_vec());
        for hfac in [&mut self.hfac_c, &mut self.hfac_w, &mut self.hfac_s] {
            hfac.slice_mut(s![.., j, i]).assign(&column);
        }
    }

    /// Make a column dry on all three sub-grids.
    pub fn with_land(mut self, j: usize, i: usize) -> Self {
        let dry = vec![0.0; self.nz()];
        self.set_column(j, i, &dry);
        self
    }

    /// Put an ice shelf base in layer `k`, wet for `fraction` of it.
    ///
    /// Layers above `k` become dry.
    pub fn with_ice_shelf(mut self, j: usize, i: usize, k: usize, fraction: f64) -> Self {
        let mut column = self.hfac_c.slice(s![.., j, i]).to_vec();
        for cell in column.iter_mut().take(k) {
            *cell = 0.0;
        }
        if let Some(cell) = column.get_mut(k) {
            *cell = fraction;
        }
        self.set_column(j, i, &column);
        self
    }

    /// Put the seafloor in layer `k`, wet for `fraction` of it.
    ///
    /// Layers below `k` become dry.
    pub fn with_seafloor(mut self, j: usize, i: usize, k: usize, fraction: f64) -> Self {
        let mut column = self.hfac_c.slice(s![.., j, i]).to_vec();
        if let Some(cell) = column.get_mut(k) {
            *cell = fraction;
        }
        for cell in column.iter_mut().skip(k + 1) {
            *cell = 0.0;
        }
        self.set_column(j, i, &column);
        self
    }

    pub fn with_mesh_coordinates(mut self) -> Self {
        self.mesh_coordinates = true;
        self
    }

    pub fn with_depth(mut self, depth: Array2<f64>) -> Self {
        self.depth = Some(depth);
        self
    }

    fn spacing(axis: &Array1<f64>) -> f64 {
        if axis.len() >= 2 {
            axis[1] - axis[0]
        } else {
            1.0
        }
    }

    /// Corner longitudes, half a cell west of the centres.
    pub fn lon_corners(&self) -> Array1<f64> {
        let half = Self::spacing(&self.lon) / 2.0;
        self.lon.mapv(|v| v - half)
    }

    /// Corner latitudes, half a cell south of the centres.
    pub fn lat_corners(&self) -> Array1<f64> {
        let half = Self::spacing(&self.lat) / 2.0;
        self.lat.mapv(|v| v - half)
    }

    /// Interface depths, `nz + 1` values from 0 downwards.
    pub fn z_edges(&self) -> Array1<f64> {
        let mut edges = Vec::with_capacity(self.nz() + 1);
        let mut depth = 0.0;
        edges.push(depth);
        for dz in self.dz.iter() {
            depth -= dz;
            edges.push(depth);
        }
        Array1::from(edges)
    }

    /// Centre depths.
    pub fn z(&self) -> Array1<f64> {
        let edges = self.z_edges();
        Array1::from_shape_fn(self.nz(), |k| 0.5 * (edges[k] + edges[k + 1]))
    }

    /// Water column thickness.
    pub fn depth(&self) -> Array2<f64> {
        if let Some(depth) = &self.depth {
            return depth.clone();
        }
        let dz = self.dz.view().insert_axis(Axis(1)).insert_axis(Axis(2));
        (&self.hfac_c * &dz).sum_axis(Axis(0))
    }

    fn mesh(&self, lon: &Array1<f64>, lat: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
        let (ny, nx) = (lat.len(), lon.len());
        (
            Array2::from_shape_fn((ny, nx), |(_, i)| lon[i]),
            Array2::from_shape_fn((ny, nx), |(j, _)| lat[j]),
        )
    }

    fn coordinate(&self, axis: Array1<f64>, mesh: Array2<f64>) -> ArrayD<f64> {
        if self.mesh_coordinates {
            mesh.into_dyn()
        } else {
            axis.into_dyn()
        }
    }

    /// All fifteen raw variables.
    pub fn variables(&self) -> Vec<(GridVariable, ArrayD<f64>)> {
        let (lon_c, lat_c) = (self.lon_corners(), self.lat_corners());
        let (lon_2d, lat_2d) = self.mesh(&self.lon, &self.lat);
        let (lon_g_2d, lat_g_2d) = self.mesh(&lon_c, &lat_c);

        let dlon = Self::spacing(&self.lon).abs();
        let dlat = Self::spacing(&self.lat).abs();
        let dx = lat_g_2d.mapv(|lat| dlon * METRES_PER_DEGREE * lat.to_radians().cos());
        let dy = Array2::from_elem(lat_2d.raw_dim(), dlat * METRES_PER_DEGREE);
        let area = lat_2d.mapv(|lat| dlon * dlat * METRES_PER_DEGREE.powi(2) * lat.to_radians().cos());

        let z = self.z();
        let mut drc = Vec::with_capacity(self.nz());
        for k in 0..self.nz() {
            let above = if k == 0 { 0.0 } else { z[k - 1] };
            drc.push(above - z[k]);
        }

        vec![
            (GridVariable::Xc, self.coordinate(self.lon.clone(), lon_2d)),
            (GridVariable::Yc, self.coordinate(self.lat.clone(), lat_2d)),
            (GridVariable::Xg, self.coordinate(lon_c, lon_g_2d)),
            (GridVariable::Yg, self.coordinate(lat_c, lat_g_2d)),
            (GridVariable::Dxg, dx.into_dyn()),
            (GridVariable::Dyg, dy.into_dyn()),
            (GridVariable::Rac, area.into_dyn()),
            (GridVariable::Rc, z.into_dyn()),
            (GridVariable::Rf, self.z_edges().into_dyn()),
            (GridVariable::Drf, self.dz.clone().into_dyn()),
            (GridVariable::Drc, Array1::from(drc).into_dyn()),
            (GridVariable::HFacC, self.hfac_c.clone().into_dyn()),
            (GridVariable::HFacW, self.hfac_w.clone().into_dyn()),
            (GridVariable::HFacS, self.hfac_s.clone().into_dyn()),
            (GridVariable::Depth, self.depth().into_dyn()),
        ]
    }

    /// The raw variables as an in-memory source using MDS spelling.
    pub fn to_memory_source(&self) -> MemorySource {
        self.to_memory_source_as(SourceKind::Mds)
    }

    /// The raw variables as an in-memory source with the given spelling.
    pub fn to_memory_source_as(&self, kind: SourceKind) -> MemorySource {
        self.variables()
            .into_iter()
            .fold(MemorySource::new(kind), |source, (var, array)| {
                source.with_variable(var, array)
            })
    }

    /// Write the raw variables as MDS files into `dir`.
    pub fn write_mds_dir(&self, dir: &Path, precision: Precision) -> ReaderResult<()> {
        for (var, array) in self.variables() {
            write_mds(dir, var.mds_name(), array.view(), precision)?;
        }
        Ok(())
    }
}

/// A field whose value encodes its indices: `k * 1e6 + j * 1e3 + i`.
///
/// Makes re-indexing easy to check after a read.
pub fn index_field(nz: usize, ny: usize, nx: usize) -> Array3<f64> {
    Array3::from_shape_fn((nz, ny, nx), |(k, j, i)| {
        k as f64 * 1e6 + j as f64 * 1e3 + i as f64
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_axes() {
        let grid = SyntheticGrid::regular((0.5, 1.0, 2), (-70.5, 1.0, 2), vec![10.0, 20.0]);
        assert_eq!(grid.z_edges().to_vec(), vec![0.0, -10.0, -30.0]);
        assert_eq!(grid.z().to_vec(), vec![-5.0, -20.0]);
    }

    #[test]
    fn test_depth_from_hfac() {
        let grid = SyntheticGrid::regular((0.5, 1.0, 2), (-70.5, 1.0, 1), vec![10.0, 20.0])
            .with_ice_shelf(0, 0, 1, 0.5)
            .with_land(0, 1);
        let depth = grid.depth();
        assert_eq!(depth[[0, 0]], 10.0);
        assert_eq!(depth[[0, 1]], 0.0);
    }

    #[test]
    fn test_corners_west_and_south_of_centres() {
        let grid = SyntheticGrid::regular((-69.0, 2.0, 3), (-79.5, 1.0, 2), vec![10.0]);
        assert_eq!(grid.lon_corners().to_vec(), vec![-70.0, -68.0, -66.0]);
        assert_eq!(grid.lat_corners().to_vec(), vec![-80.0, -79.0]);
    }

    #[test]
    fn test_all_variables_present() {
        let grid = SyntheticGrid::regular((0.5, 1.0, 2), (-70.5, 1.0, 2), vec![10.0]);
        let vars: Vec<_> = grid.variables().into_iter().map(|(v, _)| v).collect();
        assert_eq!(vars.len(), GridVariable::ALL.len());
        for var in GridVariable::ALL {
            assert!(vars.contains(&var), "missing {}", var);
        }
    }

    #[test]
    fn test_index_field() {
        let f = index_field(2, 3, 4);
        assert_eq!(f[[1, 2, 3]], 1_002_003.0);
    }
}
