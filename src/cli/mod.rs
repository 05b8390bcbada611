//! CLI module for chartforge.
//!
//! This module provides the command-line interface for generating service
//! charts and syncing the umbrella chart.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat};
pub use output::OutputFormatter;
