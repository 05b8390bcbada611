//! Chartforge CLI entrypoint.
//!
//! This is the main entrypoint for the chartforge command-line tool.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use chartforge::chart::{generate_chart, load_service_config, merged_values, BaseLibrary};
use chartforge::cli::{Cli, Commands, OutputFormatter};
use chartforge::error::Result;
use chartforge::umbrella::DependencyAggregator;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Main entrypoint.
fn main() -> ExitCode {
    // Flags fall back to CHARTFORGE_* variables, which may come from .env
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env file: {e}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run async runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let formatter = OutputFormatter::new(cli.format);
    match runtime.block_on(run(cli.command, &formatter)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {e:?}");
            eprintln!("{}", formatter.format_error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Initializes the logging system.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(command: Commands, formatter: &OutputFormatter) -> Result<()> {
    match command {
        Commands::Generate {
            config,
            library,
            output,
            name,
        } => cmd_generate(&config, &library, &output, name.as_deref(), formatter).await,
        Commands::Sync {
            umbrella,
            services,
            library,
        } => cmd_sync(&umbrella, &services, &library, formatter).await,
        Commands::Merge { config, library } => cmd_merge(&config, &library, formatter).await,
    }
}

/// Generate one service chart.
async fn cmd_generate(
    config: &Path,
    library: &Path,
    output: &Path,
    name: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    debug!("Generating chart from {}", config.display());
    let library = BaseLibrary::load(library).await?;

    let report = generate_chart(config, &library, output, name).await?;

    emit(&formatter.format_synthesis(&report))
}

/// Sync the umbrella chart.
async fn cmd_sync(
    umbrella: &Path,
    services: &Path,
    library: &Path,
    formatter: &OutputFormatter,
) -> Result<()> {
    debug!("Syncing services from {}", services.display());
    let library = BaseLibrary::load(library).await?;

    let report = DependencyAggregator::new(umbrella, &library)
        .aggregate(services)
        .await?;

    emit(&formatter.format_sync(&report))
}

/// Print merged values without writing a chart.
async fn cmd_merge(config: &Path, library: &Path, formatter: &OutputFormatter) -> Result<()> {
    let library = BaseLibrary::load(library).await?;
    let service = load_service_config(config).await?;

    emit(&formatter.format_values(&merged_values(&library, &service))?)
}

/// Writes rendered output to stdout.
fn emit(rendered: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}
