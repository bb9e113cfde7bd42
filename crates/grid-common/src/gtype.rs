//! Grid-point types on the staggered Arakawa C-grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Location of a variable within a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    /// Cell centre (tracers)
    T,
    /// Western cell face (zonal velocity)
    U,
    /// Southern cell face (meridional velocity)
    V,
    /// South-west cell corner (vorticity)
    Psi,
    /// Cell centre, vertical velocity
    W,
}

impl GridType {
    pub const ALL: [GridType; 5] = [Self::T, Self::U, Self::V, Self::Psi, Self::W];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T => "t",
            Self::U => "u",
            Self::V => "v",
            Self::Psi => "psi",
            Self::W => "w",
        }
    }

    /// Whether longitude for this point type lies on cell corners.
    pub fn lon_on_corners(&self) -> bool {
        matches!(self, Self::U | Self::Psi)
    }

    /// Whether latitude for this point type lies on cell corners.
    pub fn lat_on_corners(&self) -> bool {
        matches!(self, Self::V | Self::Psi)
    }

    /// The sub-grid carrying partial cells and masks, if any.
    ///
    /// `psi` and `w` points have no hfac of their own.
    pub fn sub_grid(&self) -> Option<SubGrid> {
        match self {
            Self::T => Some(SubGrid::T),
            Self::U => Some(SubGrid::U),
            Self::V => Some(SubGrid::V),
            Self::Psi | Self::W => None,
        }
    }
}

impl Default for GridType {
    fn default() -> Self {
        Self::T
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "t" => Ok(Self::T),
            "u" => Ok(Self::U),
            "v" => Ok(Self::V),
            "psi" => Ok(Self::Psi),
            "w" => Ok(Self::W),
            _ => Err(GridError::InvalidGridType(s.to_string())),
        }
    }
}

/// The three staggered point sets that carry hfac arrays and masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubGrid {
    T,
    U,
    V,
}

impl SubGrid {
    pub const ALL: [SubGrid; 3] = [Self::T, Self::U, Self::V];

    pub fn grid_type(&self) -> GridType {
        match self {
            Self::T => GridType::T,
            Self::U => GridType::U,
            Self::V => GridType::V,
        }
    }
}

impl fmt::Display for SubGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.grid_type().fmt(f)
    }
}

impl TryFrom<GridType> for SubGrid {
    type Error = GridError;

    fn try_from(gtype: GridType) -> Result<Self, Self::Error> {
        gtype.sub_grid().ok_or(GridError::NoSuchField {
            field: "hfac",
            gtype,
        })
    }
}

/// Resolution of a coordinate request: 1D axes or 2D meshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDim {
    One,
    Two,
}

impl TryFrom<usize> for AxisDim {
    type Error = GridError;

    fn try_from(dim: usize) -> Result<Self, Self::Error> {
        match dim {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            _ => Err(GridError::InvalidDim(dim)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid_type() {
        assert_eq!("t".parse::<GridType>().unwrap(), GridType::T);
        assert_eq!("PSI".parse::<GridType>().unwrap(), GridType::Psi);
        assert!(matches!(
            "x".parse::<GridType>(),
            Err(GridError::InvalidGridType(_))
        ));
    }

    #[test]
    fn test_corner_lookup() {
        assert!(!GridType::T.lon_on_corners() && !GridType::T.lat_on_corners());
        assert!(GridType::U.lon_on_corners() && !GridType::U.lat_on_corners());
        assert!(!GridType::V.lon_on_corners() && GridType::V.lat_on_corners());
        assert!(GridType::Psi.lon_on_corners() && GridType::Psi.lat_on_corners());
        assert!(!GridType::W.lon_on_corners() && !GridType::W.lat_on_corners());
    }

    #[test]
    fn test_sub_grid() {
        assert_eq!(SubGrid::try_from(GridType::U).unwrap(), SubGrid::U);
        assert!(SubGrid::try_from(GridType::W).is_err());
        assert!(SubGrid::try_from(GridType::Psi).is_err());
    }

    #[test]
    fn test_axis_dim() {
        assert_eq!(AxisDim::try_from(1).unwrap(), AxisDim::One);
        assert_eq!(AxisDim::try_from(2).unwrap(), AxisDim::Two);
        assert!(matches!(AxisDim::try_from(3), Err(GridError::InvalidDim(3))));
    }
}
