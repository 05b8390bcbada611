//! Umbrella chart module.
//!
//! This module folds many service charts into one umbrella chart:
//! - Discovering `configuration.yml` files under a services directory
//! - Generating a chart per service under the umbrella's `packages/`
//! - Rewriting the umbrella descriptor's dependency list

mod aggregator;
mod discovery;

pub use aggregator::{DependencyAggregator, PACKAGES_DIR};
pub use discovery::find_service_configs;
