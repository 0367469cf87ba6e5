pub mod config;
pub mod format;
pub mod history;
pub mod logging;
pub mod planner;
pub mod render;
pub mod session;
pub mod stats;
pub mod types;
pub mod validate;
