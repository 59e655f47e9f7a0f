#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod render;
pub mod store;

pub use cli::{Cli, Commands, GlobalArgs, run, run_from_env};
pub use error::{CliError, Result};
