use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing the library document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read library file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write library file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create data directory {path}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode library")]
    Encode(#[from] serde_json::Error),
}

/// Recoverable problems found while loading. The library still opens, just
/// empty, and the caller decides how loudly to mention it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The file exists but is not a JSON array of books.
    Decode { path: PathBuf, message: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::Decode { path, message } => write!(
                f,
                "Could not decode {} ({message}). Starting with an empty library.",
                path.display()
            ),
        }
    }
}
