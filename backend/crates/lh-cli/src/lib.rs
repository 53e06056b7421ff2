//! lh-cli library
//!
//! Wiring from configuration to the resolver and sync coordinator, shared by
//! the `lh` binary and its tests.

pub mod app;
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;

pub use app::{App, parse_value};
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result};
