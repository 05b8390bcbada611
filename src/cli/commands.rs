//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chart::DEFAULT_LIBRARY_DIR;

/// Chartforge - Helm chart generator for platform services.
#[derive(Parser, Debug)]
#[command(name = "chartforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a Helm chart from a service configuration.
    Generate {
        /// Path to the service configuration.yml file.
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the platform library chart directory.
        #[arg(short, long, env = "CHARTFORGE_LIBRARY", default_value = DEFAULT_LIBRARY_DIR)]
        library: PathBuf,

        /// Output directory for the generated chart.
        #[arg(short, long)]
        output: PathBuf,

        /// Chart name (defaults to service.name from the configuration).
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Sync service configurations into the umbrella chart's dependencies.
    Sync {
        /// Path to the umbrella chart directory.
        #[arg(short, long, env = "CHARTFORGE_UMBRELLA")]
        umbrella: PathBuf,

        /// Directory containing service configuration.yml files.
        #[arg(short, long, env = "CHARTFORGE_SERVICES")]
        services: PathBuf,

        /// Path to the platform library chart directory.
        #[arg(short, long, env = "CHARTFORGE_LIBRARY", default_value = DEFAULT_LIBRARY_DIR)]
        library: PathBuf,
    },

    /// Print the merged values for a service without writing a chart.
    Merge {
        /// Path to the service configuration.yml file.
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the platform library chart directory.
        #[arg(short, long, env = "CHARTFORGE_LIBRARY", default_value = DEFAULT_LIBRARY_DIR)]
        library: PathBuf,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}
