use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::config::{DetscaleConfig, MatrixSourceKind};
use crate::matrix::read_matrix;
use crate::parallel::{ExecutionBackend, ExperimentProgress};
use crate::reports::{ReportFormat, ScalingLayout, write_scaling_results};
use crate::scaling::{ScalingHarness, ScalingKind, ScalingResult};

/// Options shared by both experiments
#[derive(Args)]
pub struct ReportArgs {
    /// Scaling table to write (overwritten); defaults to <results_dir>/<kind>_scaling.<ext>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// CSV column layout
    #[arg(long, value_enum, default_value_t)]
    pub layout: ScalingLayout,

    /// Table format
    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,

    /// Execution backend for the parallel runs
    #[arg(long, value_enum)]
    pub backend: Option<ExecutionBackend>,

    /// Matrix source for experiment orders (overrides scaling.matrix_source)
    #[arg(long, value_enum)]
    pub source: Option<MatrixSourceKind>,
}

#[derive(Args)]
pub struct StrongArgs {
    /// Matrix file to scale over
    #[arg(short, long, conflicts_with = "order")]
    pub matrix: Option<PathBuf>,

    /// Matrix order taken from the configured matrix source
    #[arg(short = 'n', long)]
    pub order: Option<usize>,

    /// Largest worker count (defaults to scaling.max_workers, 0 meaning the order)
    #[arg(short = 'p', long)]
    pub max_workers: Option<usize>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct WeakArgs {
    /// Matrix orders to visit, e.g. 3,5,8
    #[arg(long, value_delimiter = ',')]
    pub orders: Option<Vec<usize>>,

    #[command(flatten)]
    pub report: ReportArgs,
}

pub fn execute_strong(args: StrongArgs, config: &DetscaleConfig, output: &Output) -> Result<()> {
    let matrix = match &args.matrix {
        Some(path) => read_matrix(path)
            .with_context(|| format!("Failed to load matrix from {}", path.display()))?,
        None => {
            let order = args.order.unwrap_or(config.scaling.strong_order);
            config
                .matrix_source(args.report.source)
                .matrix_of_order(order)
                .with_context(|| format!("Failed to obtain a matrix of order {order}"))?
        }
    };
    let order = matrix.order();
    let max_workers = args.max_workers.unwrap_or_else(|| config.max_workers_for(order));

    output.header(&format!(
        "Strong scaling: order {order}, 2..={max_workers} workers"
    ));

    let harness = harness(&args.report, config);
    let progress = progress_for(output, "strong", max_workers.saturating_sub(1));
    let results = harness
        .run_strong_scaling(&matrix, max_workers, Some(progress.reporter()))
        .context("Strong scaling failed")?;
    progress.finish();

    if results.is_empty() {
        output.warning("Fewer than 2 workers requested; nothing to measure");
    }
    report(ScalingKind::Strong, &args.report, config, output, &results)
}

pub fn execute_weak(args: WeakArgs, config: &DetscaleConfig, output: &Output) -> Result<()> {
    let orders = args
        .orders
        .unwrap_or_else(|| config.scaling.weak_orders.clone());
    let source = config.matrix_source(args.report.source);

    output.header(&format!("Weak scaling: orders {orders:?}"));

    let harness = harness(&args.report, config);
    let progress = progress_for(output, "weak", orders.len());
    let results = harness
        .run_weak_scaling(source.as_ref(), &orders, Some(progress.reporter()))
        .context("Weak scaling failed")?;
    progress.finish();

    report(ScalingKind::Weak, &args.report, config, output, &results)
}

fn harness(args: &ReportArgs, config: &DetscaleConfig) -> ScalingHarness {
    ScalingHarness::new(args.backend.unwrap_or(config.parallel.backend))
}

fn progress_for(output: &Output, label: &str, total: usize) -> ExperimentProgress {
    if output.is_quiet() {
        ExperimentProgress::hidden(total)
    } else {
        ExperimentProgress::new(label, total)
    }
}

fn report(
    kind: ScalingKind,
    args: &ReportArgs,
    config: &DetscaleConfig,
    output: &Output,
    results: &[ScalingResult],
) -> Result<()> {
    let path = args.output.clone().unwrap_or_else(|| {
        let extension = match args.format {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        };
        let stem = match kind {
            ScalingKind::Strong => "strong",
            ScalingKind::Weak => "weak",
        };
        config
            .data
            .results_dir
            .join(format!("{stem}_scaling.{extension}"))
    });

    output.scaling_table(results);
    output.verbose(&format!("Theoretical bound: {}", kind.law()));

    write_scaling_results(&path, results, args.format, args.layout)?;
    output.success(&format!(
        "Wrote {} scaling rows to {}",
        results.len(),
        path.display()
    ));
    Ok(())
}
