#![warn(clippy::uninlined_format_args)]

pub mod browser;
pub mod cli;
pub mod config;
pub mod env_file;
pub mod error;
pub mod launcher;
pub mod paths;
pub mod readiness;
pub mod server_command;

pub use cli::Cli;
pub use config::LauncherConfig;
pub use error::LaunchError;
pub use launcher::{LaunchOutcome, Launcher};
