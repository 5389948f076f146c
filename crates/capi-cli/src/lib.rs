//! capi - host for the embedded Copilot API server
//!
//! Library half of the `capi` binary, split out so the console loop and
//! UI adapters can be exercised in tests.

pub(crate) mod cli;
pub(crate) mod commands;
pub mod console;
pub mod console_command;
pub mod console_ui;
pub mod error;
pub mod file_settings;
pub mod logger;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use commands::Commands;
pub use console::{run_console, serve};
pub use console_command::ConsoleCommand;
pub use console_ui::ConsoleUi;
pub use error::{CliError, Result as CliResult};
pub use file_settings::FileSettings;
