//! Umbrella chart dependency sync.
//!
//! Generates a chart for every discovered service into the umbrella's
//! `packages/` directory and rewrites the umbrella descriptor's dependency
//! list to point at them.

use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::chart::{
    file_locator, generate_from_config, write_yaml, BaseLibrary, DependencyEntry,
    DEFAULT_CHART_VERSION, DESCRIPTOR_FILE,
};
use crate::config::{service_name, ConfigLoader, ServiceConfig};
use crate::error::{ChartError, Result, UmbrellaError};
use crate::report::{Diagnostic, SyncReport};

use super::discovery::find_service_configs;

/// Directory under the umbrella chart that holds generated service charts.
pub const PACKAGES_DIR: &str = "packages";

/// Key of the dependency list in a descriptor.
const DEPENDENCIES_KEY: &str = "dependencies";

/// Syncs service charts into an umbrella chart.
#[derive(Debug)]
pub struct DependencyAggregator<'a> {
    /// Umbrella chart directory.
    umbrella_dir: PathBuf,
    /// Library every service chart depends on.
    library: &'a BaseLibrary,
}

impl<'a> DependencyAggregator<'a> {
    /// Creates an aggregator for the umbrella chart at `umbrella_dir`.
    #[must_use]
    pub fn new(umbrella_dir: impl Into<PathBuf>, library: &'a BaseLibrary) -> Self {
        Self {
            umbrella_dir: umbrella_dir.into(),
            library,
        }
    }

    /// Returns the umbrella descriptor path.
    #[must_use]
    pub fn descriptor_path(&self) -> PathBuf {
        self.umbrella_dir.join(DESCRIPTOR_FILE)
    }

    /// Returns the directory a service's chart is generated into.
    #[must_use]
    pub fn package_dir(&self, service: &str) -> PathBuf {
        self.umbrella_dir.join(PACKAGES_DIR).join(service)
    }

    /// Returns the path of a service's values snapshot.
    #[must_use]
    pub fn snapshot_path(&self, service: &str) -> PathBuf {
        self.umbrella_dir.join(format!("values-{service}.yaml"))
    }

    /// Generates every service under `services_dir` and rewrites the
    /// umbrella descriptor's dependency list.
    ///
    /// Configurations without a `service.name` are skipped. The first
    /// failing service aborts the run; charts already generated for earlier
    /// services stay on disk but the descriptor is not rewritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the umbrella descriptor or services directory is
    /// missing, or if any service fails to load, validate, or generate.
    pub async fn aggregate(&self, services_dir: &Path) -> Result<SyncReport> {
        info!("Syncing umbrella chart: {}", self.umbrella_dir.display());

        let descriptor_path = self.descriptor_path();
        if !descriptor_path.is_file() {
            return Err(UmbrellaError::DescriptorNotFound {
                path: descriptor_path,
            }
            .into());
        }

        let mut report = SyncReport {
            umbrella_dir: self.umbrella_dir.clone(),
            ..SyncReport::default()
        };

        let configs = find_service_configs(services_dir)?;
        if configs.is_empty() {
            warn!("No service configurations found in {}", services_dir.display());
            report.diagnostics.push(Diagnostic::warning(format!(
                "no service configurations found in {}",
                services_dir.display()
            )));
        }

        let loader = ConfigLoader::new();
        for config_path in configs {
            let raw = loader.load(&config_path).await?;
            if service_name(&raw).is_none() {
                warn!("Skipping config without service.name: {}", config_path.display());
                report.diagnostics.push(Diagnostic::warning(format!(
                    "skipping config without service.name: {}",
                    config_path.display()
                )));
                report.skipped.push(config_path);
                continue;
            }

            let config = ServiceConfig::from_values(raw)?;
            let dependency = self.sync_service(&config, &mut report).await?;
            info!("Added dependency: {}", dependency.name);
            report.dependencies.push(dependency);
        }

        self.write_dependencies(&report.dependencies).await?;
        info!(
            "Umbrella chart updated with {} service dependencies",
            report.dependencies.len()
        );

        Ok(report)
    }

    /// Generates one service chart and its values snapshot.
    async fn sync_service(
        &self,
        config: &ServiceConfig,
        report: &mut SyncReport,
    ) -> Result<DependencyEntry> {
        let package_dir = self.package_dir(&config.name);
        let chart = generate_from_config(config, self.library, &package_dir, None).await?;

        write_yaml(&self.snapshot_path(&config.name), config.values()).await?;

        let dependency = DependencyEntry::for_service_chart(
            &config.name,
            config.version.as_deref().unwrap_or(DEFAULT_CHART_VERSION),
            &file_locator(&chart.output_dir),
        );
        report.charts.push(chart);

        Ok(dependency)
    }

    /// Replaces the umbrella descriptor's dependency list, keeping every
    /// other key where it was.
    async fn write_dependencies(&self, dependencies: &[DependencyEntry]) -> Result<()> {
        let path = self.descriptor_path();
        let mut descriptor = ConfigLoader::new().load(&path).await?;

        let entries = serde_yaml::to_value(dependencies)
            .map_err(|e| ChartError::serialization(format!("dependencies: {e}")))?;
        if let Value::Mapping(mapping) = &mut descriptor {
            mapping.insert(Value::from(DEPENDENCIES_KEY), entries);
        }

        write_yaml(&path, &descriptor).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartDescriptor;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
        library: BaseLibrary,
    }

    impl Fixture {
        async fn new() -> Self {
            let temp = TempDir::new().expect("temp dir");
            let root = temp.path().to_path_buf();
            write(&root.join("lib/values.yaml"), "replicas: 1\n");
            write(
                &root.join("lib/templates/_helpers.tpl"),
                "{{- define \"platform.name\" -}}\n",
            );
            write(
                &root.join("umbrella/Chart.yaml"),
                "apiVersion: v2\nname: platform-umbrella\nversion: 0.5.0\ndependencies:\n- name: stale\n  version: 0.0.1\n  repository: file:///gone\nkeywords:\n- platform\n",
            );
            let library = BaseLibrary::load(root.join("lib")).await.expect("library");
            Self {
                _temp: temp,
                root,
                library,
            }
        }

        fn service(&self, dir: &str, content: &str) {
            write(&self.root.join("services").join(dir).join("configuration.yml"), content);
        }

        fn aggregator(&self) -> DependencyAggregator<'_> {
            DependencyAggregator::new(self.root.join("umbrella"), &self.library)
        }

        fn umbrella_descriptor(&self) -> Value {
            serde_yaml::from_str(
                &std::fs::read_to_string(self.root.join("umbrella/Chart.yaml")).expect("descriptor"),
            )
            .expect("descriptor parses")
        }
    }

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("parent dir");
        }
        std::fs::write(path, content).expect("write fixture");
    }

    #[tokio::test]
    async fn test_two_services() {
        let fx = Fixture::new().await;
        fx.service("payments", "service:\n  name: payments\ndeployment:\n  image: pay:2\nversion: \"1.4.0\"\n");
        fx.service("orders", "service:\n  name: orders\ndeployment:\n  image: orders:1\n");

        let report = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect("sync");

        let names: Vec<&str> = report.dependencies.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["orders", "payments"]);
        for dependency in &report.dependencies {
            assert_eq!(dependency.alias.as_deref(), Some(dependency.name.as_str()));
            assert!(dependency.repository.starts_with("file:///"));
            assert!(dependency.repository.ends_with(&format!("packages/{}", dependency.name)));
        }
        assert_eq!(report.dependencies[0].version, DEFAULT_CHART_VERSION);
        assert_eq!(report.dependencies[1].version, "1.4.0");

        let descriptor = fx.umbrella_descriptor();
        let written: Vec<DependencyEntry> =
            serde_yaml::from_value(descriptor["dependencies"].clone()).expect("dependencies");
        assert_eq!(written, report.dependencies);
        assert_eq!(descriptor["name"].as_str(), Some("platform-umbrella"));
        assert_eq!(descriptor["keywords"][0].as_str(), Some("platform"));

        let chart: ChartDescriptor = serde_yaml::from_str(
            &std::fs::read_to_string(fx.root.join("umbrella/packages/orders/Chart.yaml"))
                .expect("service chart"),
        )
        .expect("service chart parses");
        assert_eq!(chart.name, "orders");

        let snapshot: Value = serde_yaml::from_str(
            &std::fs::read_to_string(fx.root.join("umbrella/values-payments.yaml"))
                .expect("snapshot"),
        )
        .expect("snapshot parses");
        assert_eq!(snapshot["deployment"]["image"].as_str(), Some("pay:2"));
        assert!(snapshot.get("replicas").is_none());
    }

    #[tokio::test]
    async fn test_no_services_empties_dependencies() {
        let fx = Fixture::new().await;
        std::fs::create_dir_all(fx.root.join("services")).expect("services dir");

        let report = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect("sync succeeds");

        assert!(report.dependencies.is_empty());
        assert_eq!(report.warning_count(), 1);
        let descriptor = fx.umbrella_descriptor();
        assert_eq!(descriptor["dependencies"].as_sequence().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_config_without_name_is_skipped() {
        let fx = Fixture::new().await;
        fx.service("orders", "service:\n  name: orders\ndeployment:\n  image: orders:1\n");
        fx.service("scratch", "deployment:\n  image: scratch:1\n");

        let report = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect("sync");

        assert_eq!(report.dependencies.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].ends_with("scratch/configuration.yml"));
        assert!(report.diagnostics.iter().any(Diagnostic::is_warning));
    }

    #[tokio::test]
    async fn test_missing_umbrella_descriptor() {
        let fx = Fixture::new().await;
        fx.service("orders", "service:\n  name: orders\ndeployment:\n  image: orders:1\n");
        std::fs::remove_file(fx.root.join("umbrella/Chart.yaml")).expect("remove");

        let err = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect_err("descriptor required");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!fx.root.join("umbrella/packages").exists());
    }

    #[tokio::test]
    async fn test_failing_service_aborts_without_rewriting_descriptor() {
        let fx = Fixture::new().await;
        fx.service("a-orders", "service:\n  name: orders\ndeployment:\n  image: orders:1\n");
        fx.service("b-broken", "service:\n  name: broken\n");
        let before = std::fs::read_to_string(fx.root.join("umbrella/Chart.yaml")).expect("read");

        let err = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect_err("broken service");

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.root.join("umbrella/packages/orders/Chart.yaml").exists());
        assert_eq!(
            std::fs::read_to_string(fx.root.join("umbrella/Chart.yaml")).expect("read"),
            before
        );
    }

    #[tokio::test]
    async fn test_path_like_service_name_touches_nothing() {
        let fx = Fixture::new().await;
        write(&fx.root.join("precious/data.txt"), "keep\n");
        write(&fx.root.join("umbrella/packages/orders/Chart.yaml"), "name: orders\n");
        fx.service("a", "service:\n  name: ../../precious\ndeployment:\n  image: x:1\n");

        let err = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect_err("escaping name");

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.root.join("precious/data.txt").exists());
        assert!(!fx.root.join("precious/Chart.yaml").exists());

        fx.service("a", "service:\n  name: '.'\ndeployment:\n  image: x:1\n");
        let err = fx
            .aggregator()
            .aggregate(&fx.root.join("services"))
            .await
            .expect_err("dot name");

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fx.root.join("umbrella/packages/orders/Chart.yaml").exists());
        assert!(!fx.root.join("umbrella/packages/Chart.yaml").exists());
    }
}
