pub mod config;
pub mod discovery;
pub mod model;
pub mod providers;
pub mod session;
pub mod tui;

mod tui_shell;
