//! Persistence module split across logical submodules.

mod error;
mod json;
mod paths;

pub use error::{LoadWarning, StoreError};
pub use json::{JsonStore, Loaded};
pub use paths::{default_library_path, DATA_DIR_NAME, LIBRARY_FILE_NAME};
