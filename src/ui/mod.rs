//! Ratatui front-end: a tab per library operation, modal forms on top, and a
//! footer for status messages and key hints.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
