pub mod config;
pub mod controllers;
pub mod core;
pub mod input;
pub mod logging;
pub mod presenters;
pub mod storage;

pub use config::AppConfig;
pub use controllers::session::command::{Command, CommandOutcome};
pub use controllers::session::controller::SessionController;
pub use input::script::parse_step;
