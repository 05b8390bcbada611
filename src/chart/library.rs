//! The base library chart.
//!
//! The library provides default values and the named templates every
//! generated chart includes. It is only ever read.

use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ConfigLoader;
use crate::error::{ChartforgeError, ConfigError, Result};

/// Default library location, relative to the working directory.
pub const DEFAULT_LIBRARY_DIR: &str = "platform-library";

/// Library template directory name.
pub const TEMPLATES_DIR: &str = "templates";

/// Library defaults file name.
pub const VALUES_FILE: &str = "values.yaml";

/// File name prefix marking a library template as shared.
pub const SHARED_TEMPLATE_PREFIX: char = '_';

/// A loaded base library chart.
#[derive(Debug, Clone)]
pub struct BaseLibrary {
    /// Absolute library root.
    root: PathBuf,
    /// Default values from `values.yaml`.
    defaults: Value,
}

impl BaseLibrary {
    /// Loads the library at `path`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the directory or its `values.yaml` is
    /// missing, and a parse error if the defaults are not a YAML mapping.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let root = std::path::absolute(path).map_err(ChartforgeError::Io)?;
        info!("Using base library: {}", root.display());

        let defaults = ConfigLoader::new().load(root.join(VALUES_FILE)).await?;

        Ok(Self { root, defaults })
    }

    /// Builds a library from already-loaded parts.
    #[must_use]
    pub const fn from_parts(root: PathBuf, defaults: Value) -> Self {
        Self { root, defaults }
    }

    /// Returns the library root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the library default values.
    #[must_use]
    pub const fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// Returns the library's template directory.
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    /// Returns the `file://` locator for the library.
    #[must_use]
    pub fn repository(&self) -> String {
        file_locator(&self.root)
    }

    /// Lists shared template files, sorted by name.
    ///
    /// Returns `None` if the library has no template directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the template directory cannot be read.
    pub async fn shared_templates(&self) -> Result<Option<Vec<PathBuf>>> {
        let dir = self.templates_dir();
        if !dir.is_dir() {
            debug!("Library has no template directory: {}", dir.display());
            return Ok(None);
        }

        let mut templates = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let is_shared = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(SHARED_TEMPLATE_PREFIX));
            if is_shared && entry.file_type().await?.is_file() {
                templates.push(entry.path());
            }
        }
        templates.sort();

        Ok(Some(templates))
    }
}

/// Formats an absolute `file://` locator for `path`.
#[must_use]
pub fn file_locator(path: &Path) -> String {
    format!("file://{}", path.display())
}
