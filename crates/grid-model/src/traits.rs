//! Capabilities shared by grid variants.
//!
//! Every grid has coordinates, partial cells and land masks on the three
//! staggered sub-grids ([`StaggeredGrid`]). Only grids that model ice
//! shelf cavities have ice shelf masks ([`IceShelfGrid`]); the SOSE grid
//! does not implement it, so asking it for an ice mask does not compile.

use grid_common::{AxisDim, GridResult, GridType};
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3};

use crate::coords::{sub_grid_for, Coordinates, LonLat, PerSubGrid};

/// A grid on the staggered t/u/v point sets.
pub trait StaggeredGrid {
    fn nx(&self) -> usize;
    fn ny(&self) -> usize;
    fn nz(&self) -> usize;

    fn coordinates(&self) -> &Coordinates;

    /// Depth of cell centres (negative, m).
    fn z(&self) -> ArrayView1<'_, f64>;

    fn hfac_arrays(&self) -> &PerSubGrid<Array3<f64>>;

    fn land_masks(&self) -> &PerSubGrid<Array2<bool>>;

    /// Longitude and latitude for a point type, as 1D axes or 2D meshes.
    fn get_lon_lat(&self, gtype: GridType, dim: AxisDim) -> LonLat<'_> {
        self.coordinates().lon_lat(gtype, dim)
    }

    /// Partial-cell fractions, `[nz, ny, nx]`. No hfac exists for `psi`
    /// or `w` points.
    fn get_hfac(&self, gtype: GridType) -> GridResult<ArrayView3<'_, f64>> {
        let sub = sub_grid_for(gtype, "hfac")?;
        Ok(self.hfac_arrays().get(sub).view())
    }

    fn get_land_mask(&self, gtype: GridType) -> GridResult<ArrayView2<'_, bool>> {
        let sub = sub_grid_for(gtype, "land mask")?;
        Ok(self.land_masks().get(sub).view())
    }
}

/// A grid with ice shelf cavities.
pub trait IceShelfGrid: StaggeredGrid {
    fn ice_masks(&self) -> &PerSubGrid<Array2<bool>>;

    fn fris_masks(&self) -> &PerSubGrid<Array2<bool>>;

    fn get_ice_mask(&self, gtype: GridType) -> GridResult<ArrayView2<'_, bool>> {
        let sub = sub_grid_for(gtype, "ice shelf mask")?;
        Ok(self.ice_masks().get(sub).view())
    }

    fn get_fris_mask(&self, gtype: GridType) -> GridResult<ArrayView2<'_, bool>> {
        let sub = sub_grid_for(gtype, "FRIS mask")?;
        Ok(self.fris_masks().get(sub).view())
    }
}
