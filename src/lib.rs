//! Core library surface for the Personal Library Manager TUI.
//!
//! The `bin` target wires these pieces together; tests and other tooling can
//! reuse the store and catalog without going through the terminal UI.
pub mod catalog;
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// The in-memory collection and its file-backed store.
pub use catalog::Catalog;
pub use store::{default_library_path, JsonStore, LoadWarning, Loaded, StoreError};

/// Domain types passed between layers.
pub use models::{Book, SearchField, Statistics};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
