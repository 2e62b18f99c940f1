pub mod calendar;
pub mod client;
pub mod config;
pub mod date_tools;
pub mod logging;
pub mod types;

pub use types::{Tool, ToolSet};
