//! Chart generation.
//!
//! This module turns one service configuration into one chart:
//! - Resolving the base library chart and its defaults
//! - Merging the service configuration over the defaults
//! - Writing the chart directory through a staging directory

mod descriptor;
mod library;
mod staging;
mod synthesizer;
mod templates;

pub use descriptor::{
    ChartDescriptor, DependencyEntry, CHART_API_VERSION, CHART_TYPE, DEFAULT_APP_VERSION,
    DEFAULT_CHART_VERSION, DESCRIPTOR_FILE, LIBRARY_CHART_NAME, LIBRARY_CHART_VERSION,
};
pub use library::{
    file_locator, BaseLibrary, DEFAULT_LIBRARY_DIR, SHARED_TEMPLATE_PREFIX, TEMPLATES_DIR,
    VALUES_FILE,
};
pub use staging::{write_file, write_yaml, StagingDir};
pub use synthesizer::ChartSynthesizer;
pub use templates::{feature_enabled, selected as selected_templates, TemplateRef};

use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

use crate::config::{validate_name, ConfigLoader, ServiceConfig};
use crate::error::Result;
use crate::merge::merge;
use crate::report::SynthesisReport;

/// Loads and validates the service configuration at `config_path`.
///
/// # Errors
///
/// Returns a not-found, parse, or validation error.
pub async fn load_service_config(config_path: &Path) -> Result<ServiceConfig> {
    let raw = ConfigLoader::new().load(config_path).await?;
    ServiceConfig::from_values(raw)
}

/// Merges a validated service configuration over the library defaults.
#[must_use]
pub fn merged_values(library: &BaseLibrary, config: &ServiceConfig) -> Value {
    merge(library.defaults(), config.values())
}

/// Runs the full single-service pipeline: load, validate, merge, synthesize.
///
/// `chart_name` defaults to the configured `service.name`. Validation runs
/// before anything is written.
///
/// # Errors
///
/// Returns the first error hit by any stage.
pub async fn generate_chart(
    config_path: &Path,
    library: &BaseLibrary,
    output: &Path,
    chart_name: Option<&str>,
) -> Result<SynthesisReport> {
    let config = load_service_config(config_path).await?;
    generate_from_config(&config, library, output, chart_name).await
}

/// Runs merge and synthesis for an already validated configuration.
///
/// # Errors
///
/// Returns a validation error if `chart_name` is not a usable name, or an
/// error if the chart cannot be written.
pub async fn generate_from_config(
    config: &ServiceConfig,
    library: &BaseLibrary,
    output: &Path,
    chart_name: Option<&str>,
) -> Result<SynthesisReport> {
    let name = chart_name.unwrap_or(&config.name);
    validate_name(name)?;
    debug!("Merging configuration for '{name}' over library defaults");

    let values = merged_values(library, config);
    ChartSynthesizer::new(library)
        .synthesize(&values, output, name)
        .await
}
