//! Longitude range normalization.
//!
//! Longitudes are canonicalized into the half-open interval
//! `(max_lon - 360, max_lon]` where `max_lon` is 180 or 360.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Periodic range into which longitudes are folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LonRange {
    /// (-180, 180]
    Centered,
    /// (0, 360]
    Positive,
}

impl LonRange {
    /// Upper bound of the range.
    pub fn max_lon(&self) -> f64 {
        match self {
            Self::Centered => 180.0,
            Self::Positive => 360.0,
        }
    }

    /// Exclusive lower bound of the range.
    pub fn min_lon(&self) -> f64 {
        self.max_lon() - 360.0
    }

    /// Build from an explicit upper bound (180 or 360).
    pub fn from_max_lon(max_lon: f64) -> Result<Self, GridError> {
        if max_lon == 180.0 {
            Ok(Self::Centered)
        } else if max_lon == 360.0 {
            Ok(Self::Positive)
        } else {
            Err(GridError::InvalidConfig(format!(
                "max_lon must be 180 or 360, got {}",
                max_lon
            )))
        }
    }

    /// Choose a range from raw (un-normalized) longitudes.
    ///
    /// A domain with values on both sides of 180 is read as straddling
    /// the date line in the 0-360 convention and keeps that convention;
    /// anything else uses (-180, 180].
    pub fn detect<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = raw
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if min < 180.0 && max > 180.0 {
            Self::Positive
        } else {
            Self::Centered
        }
    }

    /// Fold one longitude into this range.
    pub fn wrap(&self, lon: f64) -> f64 {
        if !lon.is_finite() {
            return lon;
        }
        if self.contains(lon) {
            return lon;
        }
        // Offset into [0, 360); a zero offset is the closed upper end
        let offset = (lon - self.min_lon()).rem_euclid(360.0);
        if offset == 0.0 {
            self.max_lon()
        } else {
            self.min_lon() + offset
        }
    }

    /// Fold every longitude of a slice into this range.
    pub fn fix_in_place(&self, lons: &mut [f64]) {
        for lon in lons.iter_mut() {
            *lon = self.wrap(*lon);
        }
    }

    /// Whether a longitude already lies in this range.
    pub fn contains(&self, lon: f64) -> bool {
        lon > self.min_lon() && lon <= self.max_lon()
    }
}

impl fmt::Display for LonRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}]", self.min_lon(), self.max_lon())
    }
}

/// Where the periodic boundary of a global product is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Split {
    /// Seam at 0E: longitudes in (0, 360]
    Zero,
    /// Seam at 180E=180W: longitudes in (-180, 180]
    Antimeridian,
}

impl Split {
    pub fn lon_range(&self) -> LonRange {
        match self {
            Self::Zero => LonRange::Positive,
            Self::Antimeridian => LonRange::Centered,
        }
    }

    pub fn degrees(&self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::Antimeridian => 180,
        }
    }
}

impl Default for Split {
    fn default() -> Self {
        Self::Zero
    }
}

impl TryFrom<i64> for Split {
    type Error = GridError;

    fn try_from(split: i64) -> Result<Self, Self::Error> {
        match split {
            0 => Ok(Self::Zero),
            180 => Ok(Self::Antimeridian),
            _ => Err(GridError::InvalidSplit(split)),
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Check that every value is larger than the one before it.
pub fn is_strictly_increasing<I>(values: I) -> bool
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter();
    let Some(mut prev) = iter.next() else {
        return true;
    };
    for v in iter {
        // NaN fails this test too
        if !(v > prev) {
            return false;
        }
        prev = v;
    }
    true
}
