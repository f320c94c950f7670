pub mod app;
pub mod config;
pub mod event;
pub mod ui;

pub use app::App;
pub use event::{Event, EventHandler};
