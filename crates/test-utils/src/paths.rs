//! Locating MITgcm grids on disk.
//!
//! Real grids are large and not committed; tests that need one look for it
//! with [`find_test_grid`] and skip when it is absent.

use std::path::{Path, PathBuf};

/// Env var pointing at a directory of real grids, one subdirectory each.
pub const TEST_DATA_ENV: &str = "MITGCM_TEST_DATA_DIR";

/// The first ancestor of this crate holding a `[workspace]` manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .skip(1)
        .find(|dir| {
            std::fs::read_to_string(dir.join("Cargo.toml"))
                .map(|toml| toml.contains("[workspace]"))
                .unwrap_or(false)
        })
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// `testdata/` inside a member crate.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root().join("crates").join(crate_name).join("testdata")
}

/// Look for a grid called `name` under `$MITGCM_TEST_DATA_DIR`, then
/// `crates/grid-model/testdata/`, then `testdata/` at the workspace root.
pub fn find_test_grid(name: &str) -> Option<PathBuf> {
    let from_env = std::env::var_os(TEST_DATA_ENV).map(|dir| PathBuf::from(dir).join(name));
    let root = workspace_root();

    from_env
        .into_iter()
        .chain([
            crate_testdata_dir("grid-model").join(name),
            root.join("testdata").join(name),
        ])
        .find(|path| path.exists())
}

/// Scratch directory for MDS output, removed on drop.
pub fn temp_grid_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("mitgcm_grid_")
        .tempdir()
        .expect("Failed to create temporary grid directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_members() {
        let root = workspace_root();
        assert!(root.join("crates").join("grid-model").is_dir(), "{:?}", root);
    }

    #[test]
    fn test_testdata_dir_layout() {
        let dir = crate_testdata_dir("grid-reader");
        assert!(dir.ends_with("crates/grid-reader/testdata"));
    }

    #[test]
    fn test_missing_grid_is_none() {
        assert!(find_test_grid("no-such-grid-anywhere").is_none());
    }

    #[test]
    fn test_temp_grid_dir_prefix() {
        let dir = temp_grid_dir();
        let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("mitgcm_grid_"));
    }
}
