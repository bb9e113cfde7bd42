//! Longitude/latitude bounding boxes used to select geographic regions.

use serde::{Deserialize, Serialize};

/// A closed geographic bounding box, in degrees.
///
/// Bounds are inclusive on every side, so a point lying exactly on an
/// edge is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Create from the conventional `[lon_min, lon_max, lat_min, lat_max]` list.
    pub fn from_bounds(bounds: [f64; 4]) -> Self {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Parse a comma-separated string: "lon_min,lon_max,lat_min,lat_max"
    pub fn from_csv(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut bounds = [0.0; 4];
        for (slot, part) in bounds.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }
        Ok(Self::from_bounds(bounds))
    }

    /// The bounds as `[lon_min, lon_max, lat_min, lat_max]`.
    pub fn to_bounds(&self) -> [f64; 4] {
        [self.lon_min, self.lon_max, self.lat_min, self.lat_max]
    }

    /// Check that min <= max on both axes.
    pub fn is_valid(&self) -> bool {
        self.lon_min <= self.lon_max && self.lat_min <= self.lat_max
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }

    /// Return a copy with a different northern (maximum latitude) bound.
    pub fn with_lat_max(&self, lat_max: f64) -> Self {
        Self { lat_max, ..*self }
    }

    /// Return a copy with different longitude bounds.
    pub fn with_lon(&self, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            ..*self
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounds format: {0}. Expected 'lon_min,lon_max,lat_min,lat_max'")]
    InvalidFormat(String),

    #[error("Invalid number in bounds: {0}")]
    InvalidNumber(String),
}
