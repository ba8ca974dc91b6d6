//! Result files for determinant runs and scaling experiments
//!
//! Two tables are produced:
//! - an execution log, appended to across runs, with the header written only once
//! - a scaling table, overwritten by every experiment, as CSV (basic or extended
//!   columns) or JSON

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::scaling::ScalingResult;

/// Tag written in the `implementation` column of the execution log
pub const IMPLEMENTATION_TAG: &str = "rust";

const EXECUTION_LOG_HEADER: &str = "matrix,n,determinant,exec_time_ms,serial,implementation";
const BASIC_HEADER: &str = "matrix_order,worker_count,exec_time_ms";
const EXTENDED_HEADER: &str = "matrix_order,worker_count,serial_time_ms,parallel_time_ms,achieved_speedup,theoretical_max_speedup";

/// One determinant computation as recorded in the execution log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub matrix: String,
    pub order: usize,
    pub determinant: f64,
    pub exec_time_ms: f64,
    pub serial: bool,
}

impl ExecutionRecord {
    fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{:.3},{},{}",
            csv_field(&self.matrix),
            self.order,
            self.determinant,
            self.exec_time_ms,
            self.serial,
            IMPLEMENTATION_TAG
        )
    }
}

/// Appends `records` to the execution log at `path`, creating it with a header if needed
pub fn append_execution_log(path: &Path, records: &[ExecutionRecord]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open results file: {}", path.display()))?;

    let is_empty = file
        .metadata()
        .with_context(|| format!("Failed to inspect results file: {}", path.display()))?
        .len()
        == 0;

    let mut content = String::new();
    if is_empty {
        content.push_str(EXECUTION_LOG_HEADER);
        content.push('\n');
    }
    for record in records {
        content.push_str(&record.to_csv_row());
        content.push('\n');
    }

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write results file: {}", path.display()))?;
    tracing::debug!("Appended {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Column set of a CSV scaling table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScalingLayout {
    /// matrix_order, worker_count, exec_time_ms
    Basic,
    /// Adds serial time, achieved speedup and the theoretical bound
    #[default]
    Extended,
}

/// File format of a scaling table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

/// Renders scaling results into one report format
pub trait ScalingReport {
    fn render(&self, results: &[ScalingResult]) -> Result<String>;
}

/// CSV rendering with a fixed column layout
pub struct CsvScalingReport {
    layout: ScalingLayout,
}

impl CsvScalingReport {
    pub fn new(layout: ScalingLayout) -> Self {
        Self { layout }
    }
}

impl ScalingReport for CsvScalingReport {
    fn render(&self, results: &[ScalingResult]) -> Result<String> {
        let mut out = String::new();
        match self.layout {
            ScalingLayout::Basic => {
                out.push_str(BASIC_HEADER);
                out.push('\n');
                for r in results {
                    out.push_str(&format!(
                        "{},{},{:.3}\n",
                        r.matrix_order, r.worker_count, r.parallel_time_ms
                    ));
                }
            }
            ScalingLayout::Extended => {
                out.push_str(EXTENDED_HEADER);
                out.push('\n');
                for r in results {
                    out.push_str(&format!(
                        "{},{},{:.3},{:.3},{:.4},{:.4}\n",
                        r.matrix_order,
                        r.worker_count,
                        r.serial_time_ms,
                        r.parallel_time_ms,
                        r.achieved_speedup,
                        r.theoretical_max_speedup
                    ));
                }
            }
        }
        Ok(out)
    }
}

/// Pretty JSON array of every field
pub struct JsonScalingReport;

impl ScalingReport for JsonScalingReport {
    fn render(&self, results: &[ScalingResult]) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(results).context("Failed to serialize scaling results")?;
        out.push('\n');
        Ok(out)
    }
}

/// Report generator for a format/layout pair
pub fn scaling_report(format: ReportFormat, layout: ScalingLayout) -> Box<dyn ScalingReport> {
    match format {
        ReportFormat::Csv => Box::new(CsvScalingReport::new(layout)),
        ReportFormat::Json => Box::new(JsonScalingReport),
    }
}

/// Writes (overwrites) a scaling table, creating parent directories as needed
pub fn write_scaling_results(
    path: &Path,
    results: &[ScalingResult],
    format: ReportFormat,
    layout: ScalingLayout,
) -> Result<()> {
    let content = scaling_report(format, layout).render(results)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write scaling results: {}", path.display()))?;

    tracing::debug!("Wrote {} scaling rows to {}", results.len(), path.display());
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
