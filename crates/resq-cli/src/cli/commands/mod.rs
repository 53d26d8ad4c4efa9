//! CLI command handlers.

mod config;
mod docs;
mod request;

pub use config::run_config;
pub use docs::{run_completions, run_man};
pub use request::run_request;
