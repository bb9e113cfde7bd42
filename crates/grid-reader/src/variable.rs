//! The fixed vocabulary of raw grid variables.

use std::fmt;

/// File convention a source follows, which decides variable spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Directory of MDS `.meta`/`.data` pairs
    Mds,
    /// Single NetCDF file written by xmitgcm
    NetCdf,
}

/// A raw variable required to build a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridVariable {
    /// Longitude at cell centres
    Xc,
    /// Latitude at cell centres
    Yc,
    /// Longitude at cell corners
    Xg,
    /// Latitude at cell corners
    Yg,
    /// Length of the southern cell edge
    Dxg,
    /// Length of the western cell edge
    Dyg,
    /// Cell area
    Rac,
    /// Depth of cell centres
    Rc,
    /// Depth of cell interfaces
    Rf,
    /// Cell thickness
    Drf,
    /// Distance between cell centres
    Drc,
    /// Partial cell fraction at tracer points
    HFacC,
    /// Partial cell fraction at u-points
    HFacW,
    /// Partial cell fraction at v-points
    HFacS,
    /// Water column thickness
    Depth,
}

impl GridVariable {
    pub const ALL: [GridVariable; 15] = [
        Self::Xc,
        Self::Yc,
        Self::Xg,
        Self::Yg,
        Self::Dxg,
        Self::Dyg,
        Self::Rac,
        Self::Rc,
        Self::Rf,
        Self::Drf,
        Self::Drc,
        Self::HFacC,
        Self::HFacW,
        Self::HFacS,
        Self::Depth,
    ];

    /// MDS file name stem.
    pub fn mds_name(&self) -> &'static str {
        match self {
            Self::Xc => "XC",
            Self::Yc => "YC",
            Self::Xg => "XG",
            Self::Yg => "YG",
            Self::Dxg => "DXG",
            Self::Dyg => "DYG",
            Self::Rac => "RAC",
            Self::Rc => "RC",
            Self::Rf => "RF",
            Self::Drf => "DRF",
            Self::Drc => "DRC",
            Self::HFacC => "hFacC",
            Self::HFacW => "hFacW",
            Self::HFacS => "hFacS",
            Self::Depth => "Depth",
        }
    }

    /// xmitgcm NetCDF variable name.
    pub fn netcdf_name(&self) -> &'static str {
        match self {
            Self::Dxg => "dxG",
            Self::Dyg => "dyG",
            Self::Rac => "rA",
            Self::Rc => "Z",
            Self::Rf => "Zp1",
            Self::Drf => "drF",
            Self::Drc => "drC",
            other => other.mds_name(),
        }
    }

    /// Name in the given convention.
    pub fn name(&self, kind: SourceKind) -> &'static str {
        match kind {
            SourceKind::Mds => self.mds_name(),
            SourceKind::NetCdf => self.netcdf_name(),
        }
    }

    /// Name in the other convention, if it differs.
    pub fn alternate_name(&self, kind: SourceKind) -> Option<&'static str> {
        let other = match kind {
            SourceKind::Mds => self.netcdf_name(),
            SourceKind::NetCdf => self.mds_name(),
        };
        (other != self.name(kind)).then_some(other)
    }
}

impl fmt::Display for GridVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mds_name())
    }
}
