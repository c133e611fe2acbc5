//! Tracelint CLI library.
//!
//! This library provides the core functionality for the `tracelint` command-line
//! interface: argument parsing, configuration loading, file-backed snapshot and
//! rule sources, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod sources;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
