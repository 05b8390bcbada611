//! Output formatting for CLI commands.
//!
//! This module renders pipeline reports for the terminal, either as colored
//! text with tables or as JSON for scripting.

use colored::Colorize;
use serde_yaml::Value;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::error::{ChartError, Result};
use crate::report::{Diagnostic, DiagnosticLevel, SyncReport, SynthesisReport};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Dependency row for table display.
#[derive(Tabled)]
struct DependencyRow {
    #[tabled(rename = "Service Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Alias")]
    alias: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of generating one chart.
    #[must_use]
    pub fn format_synthesis(&self, report: &SynthesisReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = Self::format_diagnostics(&report.diagnostics);

                for artifact in &report.artifacts {
                    let _ = writeln!(output, "{} Created {}", "✓".green(), artifact.display());
                }

                let _ = write!(
                    output,
                    "\n{}\nOutput directory: {}\nValues digest: {}\n",
                    "✓ Chart generated successfully!".green().bold(),
                    report.output_dir.display().to_string().cyan(),
                    Self::short_digest(&report.values_digest)
                );

                output
            }
        }
    }

    /// Formats the result of syncing the umbrella chart.
    #[must_use]
    pub fn format_sync(&self, report: &SyncReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = Self::format_diagnostics(&report.diagnostics);

                for chart in &report.charts {
                    let _ = writeln!(
                        output,
                        "{} Generated chart for {} ({} files)",
                        "✓".green(),
                        chart.chart_name,
                        chart.artifacts.len()
                    );
                    output.push_str(&Self::format_diagnostics(&chart.diagnostics));
                }

                let _ = write!(
                    output,
                    "\n{}\nFound {} service dependencies\n",
                    "✓ Umbrella chart updated!".green().bold(),
                    report.dependencies.len()
                );

                if !report.dependencies.is_empty() {
                    let rows: Vec<DependencyRow> = report
                        .dependencies
                        .iter()
                        .map(|d| DependencyRow {
                            name: d.name.clone(),
                            version: d.version.clone(),
                            alias: d.alias.clone().unwrap_or_default(),
                        })
                        .collect();

                    output.push('\n');
                    output.push_str(&Table::new(rows).to_string());
                    output.push('\n');
                }

                output
            }
        }
    }

    /// Formats merged values.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the values cannot be represented in
    /// the selected format, such as JSON with non-string mapping keys.
    pub fn format_values(&self, values: &Value) -> Result<String> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(values)
                .map_err(|e| ChartError::serialization(format!("merged values as JSON: {e}")))?,
            OutputFormat::Text => serde_yaml::to_string(values)
                .map_err(|e| ChartError::serialization(format!("merged values as YAML: {e}")))?,
        };
        Ok(rendered)
    }

    /// Formats an error for display.
    #[must_use]
    pub fn format_error(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "error", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "Error:".red()),
        }
    }

    /// Formats diagnostics, one per line.
    fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();
        for diagnostic in diagnostics {
            let _ = match diagnostic.level {
                DiagnosticLevel::Info => {
                    writeln!(output, "{} {}", "✓".green(), diagnostic.message)
                }
                DiagnosticLevel::Warning => {
                    writeln!(output, "{} {}", "Warning:".yellow(), diagnostic.message)
                }
            };
        }
        output
    }

    /// Shortens a hex digest for display.
    fn short_digest(digest: &str) -> &str {
        &digest[..12.min(digest.len())]
    }
}
