//! Configuration of the named geographic regions used by the masks.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bbox::BoundingBox;
use crate::error::{GridError, GridResult};

/// Geographic constants for the region masks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Outer bounds on the Filchner-Ronne Ice Shelf (a few extra degrees).
    pub fris: BoundingBox,

    /// Longitude splitting FRIS into a western and an eastern box.
    pub fris_split_lon: f64,

    /// Northern latitude cap of the western FRIS box.
    pub fris_west_lat_max: f64,

    /// Northern latitude cap of the eastern FRIS box.
    pub fris_east_lat_max: f64,

    /// Bounds on the Eastern Weddell ice shelves.
    pub ewed: BoundingBox,

    /// Bounds on the Southern Weddell Sea continental shelf.
    pub sws_shelf: BoundingBox,

    /// Shelf points must be at least this shallow (negative, m).
    pub sws_shelf_min_bathy: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            fris: BoundingBox::new(-85.0, -29.0, -84.0, -74.0),
            fris_split_lon: -45.0,
            fris_west_lat_max: -74.7,
            fris_east_lat_max: -77.85,
            ewed: BoundingBox::new(-30.0, 40.0, -77.0, -65.0),
            sws_shelf: BoundingBox::new(-70.0, -30.0, -79.0, -72.0),
            sws_shelf_min_bathy: -1250.0,
        }
    }
}

impl RegionConfig {
    /// Load configuration from environment variables.
    ///
    /// Bounds are given as "lon_min,lon_max,lat_min,lat_max". Values that
    /// fail to parse are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let bbox_vars: [(&str, &mut BoundingBox); 3] = [
            ("FRIS_BOUNDS", &mut config.fris),
            ("EWED_BOUNDS", &mut config.ewed),
            ("SWS_SHELF_BOUNDS", &mut config.sws_shelf),
        ];
        for (var, slot) in bbox_vars {
            if let Ok(val) = std::env::var(var) {
                match BoundingBox::from_csv(&val) {
                    Ok(bbox) => *slot = bbox,
                    Err(e) => warn!(var = var, error = %e, "Ignoring invalid bounds"),
                }
            }
        }

        let scalar_vars: [(&str, &mut f64); 4] = [
            ("FRIS_SPLIT_LON", &mut config.fris_split_lon),
            ("FRIS_WEST_LAT_MAX", &mut config.fris_west_lat_max),
            ("FRIS_EAST_LAT_MAX", &mut config.fris_east_lat_max),
            ("SWS_SHELF_MIN_BATHY", &mut config.sws_shelf_min_bathy),
        ];
        for (var, slot) in scalar_vars {
            if let Ok(val) = std::env::var(var) {
                match val.trim().parse() {
                    Ok(v) => *slot = v,
                    Err(_) => warn!(var = var, value = %val, "Ignoring invalid number"),
                }
            }
        }

        config
    }

    /// Parse configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> GridResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON, as written by `serde_json::to_string`.
    pub fn from_json_str(json: &str) -> GridResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GridResult<()> {
        for (name, bbox) in [
            ("fris", &self.fris),
            ("ewed", &self.ewed),
            ("sws_shelf", &self.sws_shelf),
        ] {
            if !bbox.is_valid() {
                return Err(GridError::InvalidConfig(format!(
                    "{} bounds must have min <= max: {:?}",
                    name,
                    bbox.to_bounds()
                )));
            }
        }

        if self.fris_split_lon < self.fris.lon_min || self.fris_split_lon > self.fris.lon_max {
            return Err(GridError::InvalidConfig(format!(
                "fris_split_lon {} lies outside the FRIS longitude bounds",
                self.fris_split_lon
            )));
        }

        if self.sws_shelf_min_bathy > 0.0 {
            return Err(GridError::InvalidConfig(
                "sws_shelf_min_bathy must be negative (depth below sea level)".to_string(),
            ));
        }

        Ok(())
    }

    /// Western FRIS box: up to and including the split longitude.
    pub fn fris_west(&self) -> BoundingBox {
        self.fris
            .with_lon(self.fris.lon_min, self.fris_split_lon)
            .with_lat_max(self.fris_west_lat_max)
    }

    /// Eastern FRIS box: east of the split longitude.
    ///
    /// The split longitude itself belongs to the western box; callers
    /// must exclude it when testing this box.
    pub fn fris_east(&self) -> BoundingBox {
        self.fris
            .with_lon(self.fris_split_lon, self.fris.lon_max)
            .with_lat_max(self.fris_east_lat_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegionConfig::default();
        assert_eq!(config.fris.to_bounds(), [-85.0, -29.0, -84.0, -74.0]);
        assert_eq!(config.fris_split_lon, -45.0);
        assert_eq!(config.sws_shelf_min_bathy, -1250.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fris_boxes() {
        let config = RegionConfig::default();
        let west = config.fris_west();
        let east = config.fris_east();
        assert_eq!(west.to_bounds(), [-85.0, -45.0, -84.0, -74.7]);
        assert_eq!(east.to_bounds(), [-45.0, -29.0, -84.0, -77.85]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RegionConfig::default();
        config.ewed = BoundingBox::new(40.0, -30.0, -77.0, -65.0);
        assert!(config.validate().is_err());

        config = RegionConfig::default();
        config.fris_split_lon = 0.0;
        assert!(config.validate().is_err());

        config = RegionConfig::default();
        config.sws_shelf_min_bathy = 1250.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = "sws_shelf_min_bathy: -1000.0\newed:\n  lon_min: -20.0\n  lon_max: 30.0\n  lat_min: -75.0\n  lat_max: -66.0\n";
        let config = RegionConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.sws_shelf_min_bathy, -1000.0);
        assert_eq!(config.ewed.lon_min, -20.0);
        assert_eq!(config.fris, RegionConfig::default().fris);
    }

    #[test]
    fn test_from_yaml_rejects_bad_bounds() {
        let yaml = "fris:\n  lon_min: 0.0\n  lon_max: -10.0\n  lat_min: -84.0\n  lat_max: -74.0\n";
        assert!(RegionConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = RegionConfig::default();
        config.sws_shelf_min_bathy = -900.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RegionConfig::from_json_str(&json).unwrap(), config);
    }
}
