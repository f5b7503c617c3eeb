mod app;
mod effects;
mod events;
pub mod logging;
mod ui;

pub use app::{run_app, AppConfig};
