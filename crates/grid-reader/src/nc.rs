//! NetCDF grid files written by xmitgcm.

use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::error::{ReaderError, ReaderResult};
use crate::source::RawGridSource;
use crate::variable::SourceKind;

/// An open NetCDF grid file.
pub struct NetCdfFile {
    path: PathBuf,
    file: netcdf::File,
}

impl NetCdfFile {
    pub fn open<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for NetCdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetCdfFile").field("path", &self.path).finish()
    }
}

impl RawGridSource for NetCdfFile {
    fn kind(&self) -> SourceKind {
        SourceKind::NetCdf
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn has_array(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>> {
        let var = self
            .file
            .variable(name)
            .ok_or_else(|| ReaderError::MissingVariable(name.to_string()))?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let values: Vec<f64> = var.get_values(..)?;
        debug!(name = name, shape = ?shape, "Read NetCDF variable");

        ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|e| ReaderError::InvalidFormat(format!("{}: {}", name, e)))
    }
}
