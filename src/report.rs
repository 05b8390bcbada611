//! Structured run results.
//!
//! Every pipeline stage returns what it produced and what it noticed instead
//! of printing. The CLI renders these reports; library callers can inspect
//! them directly.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::chart::{ChartDescriptor, DependencyEntry};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    /// Informational note.
    Info,
    /// Something was skipped or degraded but the run continued.
    Warning,
}

/// A message emitted while running a pipeline.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub level: DiagnosticLevel,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates an informational diagnostic.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }

    /// Creates a warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            message: message.into(),
        }
    }

    /// Returns true for warnings.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            DiagnosticLevel::Info => write!(f, "{}", self.message),
            DiagnosticLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Result of synthesizing one chart.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisReport {
    /// Chart name.
    pub chart_name: String,
    /// Directory the chart was written to.
    pub output_dir: PathBuf,
    /// Files written, relative to `output_dir`, in write order.
    pub artifacts: Vec<PathBuf>,
    /// SHA-256 of the written `values.yaml`.
    pub values_digest: String,
    /// The descriptor written to `Chart.yaml`.
    pub descriptor: ChartDescriptor,
    /// Diagnostics emitted during synthesis.
    pub diagnostics: Vec<Diagnostic>,
}

impl SynthesisReport {
    /// Returns true if `relative` was written.
    #[must_use]
    pub fn wrote(&self, relative: &str) -> bool {
        self.artifacts.iter().any(|a| a.as_path() == std::path::Path::new(relative))
    }
}

/// Result of syncing the umbrella chart.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Umbrella chart directory.
    pub umbrella_dir: PathBuf,
    /// Dependencies written to the umbrella descriptor, in processing order.
    pub dependencies: Vec<DependencyEntry>,
    /// Per-service synthesis results, in processing order.
    pub charts: Vec<SynthesisReport>,
    /// Configuration files skipped for lacking a service name.
    pub skipped: Vec<PathBuf>,
    /// Diagnostics emitted during the sync.
    pub diagnostics: Vec<Diagnostic>,
}

impl SyncReport {
    /// Number of warnings across the sync and every chart.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .chain(self.charts.iter().flat_map(|c| c.diagnostics.iter()))
            .filter(|d| d.is_warning())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        assert_eq!(Diagnostic::info("copied").to_string(), "copied");
        assert_eq!(
            Diagnostic::warning("no services").to_string(),
            "warning: no services"
        );
    }

    #[test]
    fn test_warning_count_includes_charts() {
        let chart = SynthesisReport {
            chart_name: String::from("orders"),
            output_dir: PathBuf::from("packages/orders"),
            artifacts: vec![PathBuf::from("Chart.yaml")],
            values_digest: String::new(),
            descriptor: ChartDescriptor::for_service("orders", "0.1.0", "1.0.0", "file:///lib"),
            diagnostics: vec![Diagnostic::warning("no library templates")],
        };
        let report = SyncReport {
            charts: vec![chart],
            diagnostics: vec![Diagnostic::warning("skipped"), Diagnostic::info("done")],
            ..SyncReport::default()
        };

        assert_eq!(report.warning_count(), 2);
        assert!(report.charts[0].wrote("Chart.yaml"));
        assert!(!report.charts[0].wrote("templates/hpa.yaml"));
    }
}
