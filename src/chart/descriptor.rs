//! Chart descriptor (`Chart.yaml`) types.

use serde::{Deserialize, Serialize};

/// Descriptor file name.
pub const DESCRIPTOR_FILE: &str = "Chart.yaml";

/// Chart API version written to every descriptor.
pub const CHART_API_VERSION: &str = "v2";

/// Chart type written to generated descriptors.
pub const CHART_TYPE: &str = "application";

/// Version used when the values do not set `version`.
pub const DEFAULT_CHART_VERSION: &str = "0.1.0";

/// App version used when the values do not set `appVersion`.
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

/// Name of the base library chart dependency.
pub const LIBRARY_CHART_NAME: &str = "platform";

/// Version the base library dependency is pinned to.
pub const LIBRARY_CHART_VERSION: &str = "1.0.0";

/// A Helm chart descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDescriptor {
    /// Chart API version.
    pub api_version: String,
    /// Chart name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Chart type.
    #[serde(rename = "type")]
    pub chart_type: String,
    /// Chart version.
    pub version: String,
    /// Version of the packaged application.
    pub app_version: String,
    /// Chart dependencies.
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
}

/// One entry of a descriptor's `dependencies` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Dependency chart name.
    pub name: String,
    /// Dependency chart version.
    pub version: String,
    /// Location of the dependency chart.
    ///
    /// This is an absolute `file://` locator resolved when the descriptor is
    /// written, so it only holds on the machine that produced it.
    pub repository: String,
    /// Alias the dependency is installed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ChartDescriptor {
    /// Builds the descriptor of a generated service chart.
    ///
    /// The only dependency is the base library chart.
    #[must_use]
    pub fn for_service(
        name: &str,
        version: &str,
        app_version: &str,
        library_repository: &str,
    ) -> Self {
        Self {
            api_version: CHART_API_VERSION.to_string(),
            name: name.to_string(),
            description: format!("Auto-generated Helm chart for {name}"),
            chart_type: CHART_TYPE.to_string(),
            version: version.to_string(),
            app_version: app_version.to_string(),
            dependencies: vec![DependencyEntry {
                name: LIBRARY_CHART_NAME.to_string(),
                version: LIBRARY_CHART_VERSION.to_string(),
                repository: library_repository.to_string(),
                alias: None,
            }],
        }
    }
}

impl DependencyEntry {
    /// Builds an umbrella dependency on a generated service chart.
    ///
    /// The alias is always the service name.
    #[must_use]
    pub fn for_service_chart(name: &str, version: &str, repository: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            repository: repository.to_string(),
            alias: Some(name.to_string()),
        }
    }
}
