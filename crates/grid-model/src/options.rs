//! Construction options for grids.

use std::path::PathBuf;

use grid_common::{GridError, GridResult, LonRange, RegionConfig, Split};
use serde::{Deserialize, Serialize};

/// Options for building a [`Grid`](crate::Grid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// X is longitude. When false, no longitude range is enforced.
    pub x_is_lon: bool,

    /// Longitude range to normalize into. `None` picks one from the data.
    pub lon_range: Option<LonRange>,

    /// Geographic constants for the region masks.
    pub regions: RegionConfig,

    /// Reject columns where the ice base and the seafloor share one
    /// partial cell.
    pub validate_partial_cells: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            x_is_lon: true,
            lon_range: None,
            regions: RegionConfig::default(),
            validate_partial_cells: false,
        }
    }
}

impl GridOptions {
    /// Load options from environment variables.
    ///
    /// Region constants come from [`RegionConfig::from_env`].
    pub fn from_env() -> Self {
        let mut options = Self {
            regions: RegionConfig::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("GRID_MAX_LON") {
            if let Ok(max_lon) = val.trim().parse::<f64>() {
                if let Ok(range) = LonRange::from_max_lon(max_lon) {
                    options.lon_range = Some(range);
                }
            }
        }

        if let Ok(val) = std::env::var("GRID_VALIDATE_PARTIAL_CELLS") {
            options.validate_partial_cells = val.to_lowercase() == "true" || val == "1";
        }

        options
    }

    /// Use a fixed longitude range instead of detecting one.
    pub fn with_lon_range(mut self, range: LonRange) -> Self {
        self.lon_range = Some(range);
        self
    }

    pub fn with_regions(mut self, regions: RegionConfig) -> Self {
        self.regions = regions;
        self
    }

    pub fn validate(&self) -> GridResult<()> {
        self.regions.validate()
    }
}

/// Options for building a [`SoseGrid`](crate::SoseGrid).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoseOptions {
    /// Where to put the periodic boundary of the SOSE longitude axis.
    pub split: Split,

    /// Latitude spacing of synthetic rows added south of the native
    /// grid. `None` continues the spacing of the first two native rows.
    pub lat_resolution: Option<f64>,
}

impl Default for SoseOptions {
    fn default() -> Self {
        Self {
            split: Split::Zero,
            lat_resolution: None,
        }
    }
}

impl SoseOptions {
    pub fn with_split(split: Split) -> Self {
        Self {
            split,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> GridResult<()> {
        if let Some(res) = self.lat_resolution {
            if !(res > 0.0) {
                return Err(GridError::InvalidConfig(format!(
                    "lat_resolution must be positive, got {}",
                    res
                )));
            }
        }
        Ok(())
    }
}

/// Default locations of grid files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPaths {
    /// Directory of MDS grid files, or a NetCDF grid file.
    pub grid_path: PathBuf,
}

impl Default for GridPaths {
    fn default() -> Self {
        Self {
            grid_path: PathBuf::from("../grid/"),
        }
    }
}

impl GridPaths {
    /// Load paths from environment variables (`MITGCM_GRID_PATH`).
    pub fn from_env() -> Self {
        let mut paths = Self::default();
        if let Ok(val) = std::env::var("MITGCM_GRID_PATH") {
            if !val.trim().is_empty() {
                paths.grid_path = PathBuf::from(val);
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GridOptions::default();
        assert!(options.x_is_lon);
        assert!(options.lon_range.is_none());
        assert!(!options.validate_partial_cells);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_sose_options_validation() {
        assert!(SoseOptions::default().validate().is_ok());
        let bad = SoseOptions {
            lat_resolution: Some(0.0),
            ..SoseOptions::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_default_grid_path() {
        assert_eq!(GridPaths::default().grid_path, PathBuf::from("../grid/"));
    }

    #[test]
    fn test_grid_paths_from_env_ignores_blank() {
        std::env::set_var("MITGCM_GRID_PATH", "  ");
        let paths = GridPaths::from_env();
        std::env::remove_var("MITGCM_GRID_PATH");
        assert_eq!(paths, GridPaths::default());
    }
}
