use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".personal-library";
/// JSON document holding the whole library.
pub const LIBRARY_FILE_NAME: &str = "library.json";

/// Resolve the absolute path to the library file inside the user's home.
pub fn default_library_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(LIBRARY_FILE_NAME))
}
