//! Command-line and environment configuration. There is no config file; the
//! only knobs are where the library lives, where logs go, and how chatty the
//! logs are.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::store::default_library_path;

/// File name used for the log when `--log-file` is not given.
pub const LOG_FILE_NAME: &str = "personal-library.log";

/// Personal Library Manager - track the books you own and the ones you've read
#[derive(Parser, Debug)]
#[command(name = "personal-library")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Path to the JSON library file
    #[arg(short, long, env = "PERSONAL_LIBRARY_FILE")]
    pub library: Option<PathBuf>,

    /// Where to write logs (defaults to a file next to the library)
    #[arg(long, env = "PERSONAL_LIBRARY_LOG")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Library file to open, falling back to the per-user default.
    pub fn library_path(&self) -> Result<PathBuf> {
        match &self.library {
            Some(path) => Ok(path.clone()),
            None => default_library_path(),
        }
    }

    /// Log file to append to. Sits beside the library unless overridden.
    pub fn log_path(&self, library_path: &Path) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        match library_path.parent() {
            Some(parent) => parent.join(LOG_FILE_NAME),
            None => PathBuf::from(LOG_FILE_NAME),
        }
    }

    /// Default filter directive derived from `-v` occurrences.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
