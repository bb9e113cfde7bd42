//! Entry points that resolve or build a [`Grid`].

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use grid_common::{GridError, GridResult, Split};
use grid_reader::{open_source, RawGridSource};
use tracing::debug;

use crate::grid::Grid;
use crate::options::{GridOptions, GridPaths};

/// A grid that is either already built or still on disk.
#[derive(Debug, Clone)]
pub enum GridArg<'a> {
    Built(&'a Grid),
    Path(PathBuf),
}

impl<'a> From<&'a Grid> for GridArg<'a> {
    fn from(grid: &'a Grid) -> Self {
        Self::Built(grid)
    }
}

impl From<PathBuf> for GridArg<'_> {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for GridArg<'_> {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for GridArg<'_> {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Return a built grid as is, or build one.
///
/// With no grid given, the grid is built from `file_path`.
pub fn choose_grid<'a, P: AsRef<Path>>(
    grid: Option<GridArg<'a>>,
    file_path: P,
    options: &GridOptions,
) -> GridResult<Cow<'a, Grid>> {
    match grid {
        Some(GridArg::Built(grid)) => Ok(Cow::Borrowed(grid)),
        Some(GridArg::Path(path)) => {
            debug!(path = %path.display(), "Building grid from path");
            Grid::open(path, options).map(Cow::Owned)
        }
        None => {
            debug!(path = %file_path.as_ref().display(), "Building grid from default path");
            Grid::open(file_path, options).map(Cow::Owned)
        }
    }
}

/// [`choose_grid`] falling back to the configured grid location
/// (`MITGCM_GRID_PATH`, else `../grid/`).
pub fn choose_default_grid<'a>(
    grid: Option<GridArg<'a>>,
    options: &GridOptions,
) -> GridResult<Cow<'a, Grid>> {
    choose_grid(grid, GridPaths::from_env().grid_path, options)
}

/// Build a grid whose longitude seam matches a SOSE split.
///
/// `split` is in degrees: 180 folds longitude into (-180, 180], 0 into
/// (0, 360]. Fails if the domain crosses the chosen seam.
pub fn grid_check_split<P: AsRef<Path>>(
    path: P,
    split: i64,
    options: &GridOptions,
) -> GridResult<Grid> {
    let split = Split::try_from(split)?;
    let source = open_source(path)?;
    grid_check_split_source(&source, split, options)
}

/// [`grid_check_split`] for an already opened source.
pub fn grid_check_split_source<S>(source: &S, split: Split, options: &GridOptions) -> GridResult<Grid>
where
    S: RawGridSource + ?Sized,
{
    let options = options.clone().with_lon_range(split.lon_range());
    let grid = match Grid::from_source(source, &options) {
        Err(GridError::NonMonotonicLongitude { .. }) => return Err(split_mismatch(split)),
        other => other?,
    };

    let (first, last) = (grid.coords.lon_1d.first(), grid.coords.lon_1d.last());
    if let (Some(first), Some(last)) = (first, last) {
        if first > last {
            return Err(split_mismatch(split));
        }
    }
    Ok(grid)
}

fn split_mismatch(split: Split) -> GridError {
    let message = match split {
        Split::Antimeridian => {
            "Looks like your domain crosses 180E. Run this again with split=0."
        }
        Split::Zero => "Looks like your domain crosses 0E. Run this again with split=180.",
    };
    GridError::SplitMismatch(message.to_string())
}
