//! The raw grid source abstraction and source auto-detection.

use std::path::Path;

use grid_common::{GridError, GridResult};
use ndarray::{Array1, ArrayD};
use tracing::{debug, info};

use crate::error::{ReaderError, ReaderResult};
use crate::mds::MdsDirectory;
use crate::variable::{GridVariable, SourceKind};

/// A source of named raw arrays.
///
/// Arrays come back with their natural rank and C-order shape, slowest
/// axis first (e.g. `hFacC` is `[nz, ny, nx]`).
pub trait RawGridSource {
    /// File convention of this source.
    fn kind(&self) -> SourceKind;

    /// Human-readable location, used in error messages.
    fn describe(&self) -> String;

    /// Whether an array with this exact name exists.
    fn has_array(&self, name: &str) -> bool;

    /// Read an array by its exact name.
    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>>;

    /// Read a grid variable, trying the other convention's spelling when
    /// the native one is absent.
    fn read_variable(&self, var: GridVariable) -> ReaderResult<ArrayD<f64>> {
        let native = var.name(self.kind());
        if !self.has_array(native) {
            if let Some(alt) = var.alternate_name(self.kind()) {
                if self.has_array(alt) {
                    debug!(variable = %var, name = alt, "Using alternate spelling");
                    return self.read_array(alt);
                }
            }
        }
        self.read_array(native)
    }

    /// Read a grid variable, reporting failures as load errors.
    fn load(&self, var: GridVariable) -> GridResult<ArrayD<f64>> {
        self.read_variable(var)
            .map_err(|e| e.into_load_error(var.name(self.kind()), &self.describe()))
    }

    /// Read any named field, reporting failures as load errors.
    fn load_field(&self, name: &str) -> GridResult<ArrayD<f64>> {
        self.read_array(name)
            .map_err(|e| e.into_load_error(name, &self.describe()))
    }
}

impl<S: RawGridSource + ?Sized> RawGridSource for Box<S> {
    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn has_array(&self, name: &str) -> bool {
        (**self).has_array(name)
    }

    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>> {
        (**self).read_array(name)
    }
}

impl<S: RawGridSource + ?Sized> RawGridSource for &S {
    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn has_array(&self, name: &str) -> bool {
        (**self).has_array(name)
    }

    fn read_array(&self, name: &str) -> ReaderResult<ArrayD<f64>> {
        (**self).read_array(name)
    }
}

/// Open a grid source from a path.
///
/// A path ending in `.nc` is read as a NetCDF file, a directory as a set
/// of MDS files. Anything else is a load error.
pub fn open_source<P: AsRef<Path>>(path: P) -> GridResult<Box<dyn RawGridSource>> {
    let path = path.as_ref();

    if path.extension().and_then(|e| e.to_str()) == Some("nc") {
        info!(path = %path.display(), "Opening NetCDF grid file");
        return open_netcdf(path);
    }

    if path.is_dir() {
        info!(path = %path.display(), "Opening MDS grid directory");
        let dir = MdsDirectory::open(path)
            .map_err(|e| e.into_load_error("<directory>", &path.display().to_string()))?;
        return Ok(Box::new(dir));
    }

    Err(GridError::NotAGridSource(path.display().to_string()))
}

#[cfg(feature = "netcdf")]
fn open_netcdf(path: &Path) -> GridResult<Box<dyn RawGridSource>> {
    let file = crate::nc::NetCdfFile::open(path)
        .map_err(|e| e.into_load_error("<file>", &path.display().to_string()))?;
    Ok(Box::new(file))
}

#[cfg(not(feature = "netcdf"))]
fn open_netcdf(path: &Path) -> GridResult<Box<dyn RawGridSource>> {
    Err(GridError::Unsupported(format!(
        "cannot read {}: built without the `netcdf` feature",
        path.display()
    )))
}

/// Collapse an array with at most one non-singleton axis to 1D.
///
/// MDS depth variables such as `RC` are stored as `[nz, 1, 1]`.
pub fn squeeze_1d(array: ArrayD<f64>, name: &str) -> ReaderResult<Array1<f64>> {
    let non_singleton = array.shape().iter().filter(|&&n| n != 1).count();
    if non_singleton > 1 {
        return Err(ReaderError::InvalidFormat(format!(
            "{} has shape {:?}, expected a single non-singleton axis",
            name,
            array.shape()
        )));
    }
    Ok(array.iter().copied().collect())
}
