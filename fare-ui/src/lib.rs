pub mod app;
pub mod clipboard;
pub mod commands;
pub mod config_loader;
pub mod csv_loader;
pub mod debounce;
pub mod feedback;
pub mod logging;
pub mod models;
pub mod presentation;
pub mod scenario;
pub mod session;
pub mod state;
pub mod utils;

pub use session::{Session, UiEvent, run_session};
