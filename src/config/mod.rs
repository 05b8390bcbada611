//! Configuration module for chartforge.
//!
//! This module handles all configuration-related functionality:
//! - Loading YAML value files into mappings
//! - Validating service configurations at the load boundary

mod loader;
mod service;

pub use loader::ConfigLoader;
pub use service::{
    lookup, lookup_scalar, lookup_str, service_name, validate_name, ServiceConfig,
    CONFIG_FILE_NAME, REQUIRED_FIELDS,
};
