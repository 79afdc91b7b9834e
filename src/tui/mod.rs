//! TUI module: Terminal User Interface using Ratatui.
//!
//! One full-screen form with a result panel, an About dialog, blocking error
//! dialogs and a centered busy indicator.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::Theme;
