//! Binary entry point: resolve configuration, start logging, load the library
//! once, and drive the Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use tracing::info;

use personal_library::config::Cli;
use personal_library::{logging, run_app, App, Catalog, JsonStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let library_path = cli.library_path()?;
    logging::init(&cli.log_path(&library_path), cli.log_level())?;
    info!(path = %library_path.display(), "opening library");

    let (catalog, warning) =
        Catalog::open(JsonStore::new(library_path)).context("failed to open library")?;

    let mut app = App::new(catalog, warning);
    run_app(&mut app)
}
