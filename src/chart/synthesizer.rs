//! Chart synthesis.
//!
//! Turns merged values into a complete chart directory: descriptor, values
//! file, copies of the library's shared templates, and the template
//! references selected by the enabled features.

use serde_yaml::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::lookup_scalar;
use crate::error::{ChartError, Result};
use crate::report::{Diagnostic, SynthesisReport};

use super::descriptor::{
    ChartDescriptor, DEFAULT_APP_VERSION, DEFAULT_CHART_VERSION, DESCRIPTOR_FILE,
};
use super::library::{BaseLibrary, TEMPLATES_DIR, VALUES_FILE};
use super::staging::{write_file, write_yaml, StagingDir};
use super::templates;

/// Writes charts that depend on one base library.
#[derive(Debug, Clone, Copy)]
pub struct ChartSynthesizer<'a> {
    /// Library every generated chart depends on.
    library: &'a BaseLibrary,
}

impl<'a> ChartSynthesizer<'a> {
    /// Creates a synthesizer for `library`.
    #[must_use]
    pub const fn new(library: &'a BaseLibrary) -> Self {
        Self { library }
    }

    /// Writes a chart named `chart_name` with `values` into `output`.
    ///
    /// The descriptor, values file and `templates/` directory in `output` are
    /// replaced; other files there are kept. On failure the previous content
    /// is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written or a library template
    /// cannot be copied.
    pub async fn synthesize(
        &self,
        values: &Value,
        output: &Path,
        chart_name: &str,
    ) -> Result<SynthesisReport> {
        info!("Generating chart '{chart_name}' in {}", output.display());

        let staging = StagingDir::create(output).await?;
        let mut report = SynthesisReport {
            chart_name: chart_name.to_string(),
            output_dir: staging.target().to_path_buf(),
            artifacts: Vec::new(),
            values_digest: String::new(),
            descriptor: self.descriptor(values, chart_name),
            diagnostics: Vec::new(),
        };

        match self.write_chart(staging.path(), values, &mut report).await {
            Ok(()) => {
                staging.commit().await?;
                info!("Chart '{chart_name}' generated");
                Ok(report)
            }
            Err(e) => {
                staging.discard().await;
                Err(e)
            }
        }
    }

    /// Builds the descriptor for a chart with `values`.
    #[must_use]
    pub fn descriptor(&self, values: &Value, chart_name: &str) -> ChartDescriptor {
        ChartDescriptor::for_service(
            chart_name,
            &lookup_scalar(values, "version").unwrap_or_else(|| DEFAULT_CHART_VERSION.into()),
            &lookup_scalar(values, "appVersion").unwrap_or_else(|| DEFAULT_APP_VERSION.into()),
            &self.library.repository(),
        )
    }

    /// Writes every chart file under `dir`.
    async fn write_chart(
        &self,
        dir: &Path,
        values: &Value,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let templates_dir = dir.join(TEMPLATES_DIR);
        fs::create_dir_all(&templates_dir)
            .await
            .map_err(|e| ChartError::write(&templates_dir, e))?;

        self.copy_library_templates(&templates_dir, report).await?;

        write_yaml(&dir.join(DESCRIPTOR_FILE), &report.descriptor).await?;
        report.artifacts.push(PathBuf::from(DESCRIPTOR_FILE));

        let values_yaml = write_yaml(&dir.join(VALUES_FILE), values).await?;
        report.values_digest = hex::encode(Sha256::digest(values_yaml.as_bytes()));
        report.artifacts.push(PathBuf::from(VALUES_FILE));

        for template in templates::selected(values) {
            let relative = Path::new(TEMPLATES_DIR).join(template.file_name());
            write_file(&dir.join(&relative), template.render().as_bytes()).await?;
            report.artifacts.push(relative);
        }

        Ok(())
    }

    /// Copies the library's shared templates byte-for-byte.
    async fn copy_library_templates(
        &self,
        templates_dir: &Path,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let Some(shared) = self.library.shared_templates().await? else {
            warn!("Base library has no {TEMPLATES_DIR}/ directory, nothing to copy");
            report.diagnostics.push(Diagnostic::warning(format!(
                "base library {} has no {TEMPLATES_DIR}/ directory",
                self.library.root().display()
            )));
            return Ok(());
        };

        for source in &shared {
            let Some(name) = source.file_name() else {
                continue;
            };
            let destination = templates_dir.join(name);
            fs::copy(source, &destination)
                .await
                .map_err(|e| ChartError::CopyFailed {
                    from: source.clone(),
                    to: destination.clone(),
                    source: e,
                })?;
            debug!("Copied library template {}", source.display());
            report.artifacts.push(Path::new(TEMPLATES_DIR).join(name));
        }

        report.diagnostics.push(Diagnostic::info(format!(
            "copied {} library template(s)",
            shared.len()
        )));
        Ok(())
    }
}
