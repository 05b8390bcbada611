//! Loader for YAML value files.
//!
//! Service configurations, library defaults and umbrella descriptors are all
//! read through [`ConfigLoader`], which guarantees the result is a mapping.

use crate::error::{ConfigError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, info};

/// Loader for nested-mapping YAML files.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Creates a new loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a YAML file into a mapping value.
    ///
    /// An empty document yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the path does not exist and
    /// [`ConfigError::ParseError`] if the content is not a YAML mapping.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ConfigError::parse(
                format!("Failed to read file: {e}"),
                Some(path.display().to_string()),
            )
        })?;

        self.parse_str(&content, Some(path))
    }

    /// Parses YAML text into a mapping value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the YAML is invalid or its top
    /// level is not a mapping.
    pub fn parse_str(&self, content: &str, source: Option<&Path>) -> Result<Value> {
        debug!("Parsing YAML document");
        let location = || source.map(|p| p.display().to_string());

        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse(format!("Invalid YAML: {e}"), location()))?;

        match value {
            Value::Null => Ok(Value::Mapping(Mapping::new())),
            Value::Mapping(_) => Ok(value),
            other => Err(ConfigError::parse(
                format!("expected a mapping at the top level, found {}", kind_name(&other)),
                location(),
            )
            .into()),
        }
    }
}

/// Names the YAML node kind for diagnostics.
const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
