pub mod commands;
pub mod errors;
pub mod output;
mod shell;
pub mod state;

pub use errors::{CliError, CommandError};
pub use shell::run_cli;
pub use state::{CliMode, ShellContext};
