use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::DetscaleConfig;
use crate::determinant::{ParallelCoordinator, det_serial};
use crate::matrix::read_matrix;
use crate::parallel::ExecutionBackend;
use crate::reports::{ExecutionRecord, append_execution_log};

#[derive(Args)]
pub struct RunArgs {
    /// Matrix files followed by the results file the timings are appended to
    #[arg(value_name = "MATRIX... RESULTS", num_args = 2.., required = true)]
    pub paths: Vec<PathBuf>,

    /// Worker count for the parallel run (defaults to the matrix order)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Execution backend for the parallel run
    #[arg(long, value_enum)]
    pub backend: Option<ExecutionBackend>,
}

pub fn execute(args: RunArgs, config: &DetscaleConfig, output: &Output) -> Result<()> {
    let Some((results_path, matrix_paths)) = args.paths.split_last() else {
        bail!("Expected at least one matrix file and a results file");
    };
    if matrix_paths.is_empty() {
        bail!("Expected at least one matrix file before the results file");
    }

    let coordinator = ParallelCoordinator::new(args.backend.unwrap_or(config.parallel.backend));
    let mut records = Vec::with_capacity(matrix_paths.len() * 2);

    for path in matrix_paths {
        records.extend(run_one(path, args.workers, &coordinator, output)?);
    }

    append_execution_log(results_path, &records)?;
    output.success(&format!(
        "Appended {} rows to {}",
        records.len(),
        results_path.display()
    ));
    Ok(())
}

fn run_one(
    path: &Path,
    workers: Option<usize>,
    coordinator: &ParallelCoordinator,
    output: &Output,
) -> Result<[ExecutionRecord; 2]> {
    let matrix = read_matrix(path)
        .with_context(|| format!("Failed to load matrix from {}", path.display()))?;
    let order = matrix.order();
    let workers = workers.unwrap_or(order);

    output.header(&format!("{} ({order}x{order})", path.display()));

    let serial = det_serial(&matrix);
    output.key_value("serial", &format!("{}", serial.determinant), true);
    output.key_value("serial time", &format!("{:.3} ms", serial.serial_time_ms), false);

    let parallel = coordinator
        .compute(&matrix, workers)
        .with_context(|| format!("Parallel run on {} failed", path.display()))?;
    output.key_value(
        &format!("parallel ({workers} workers)"),
        &format!("{}", parallel.value),
        true,
    );
    output.key_value("parallel time", &format!("{:.3} ms", parallel.elapsed_ms), false);

    if serial.determinant != parallel.value {
        output.warning("Serial and parallel determinants differ");
    }

    let matrix_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok([
        ExecutionRecord {
            matrix: matrix_name.clone(),
            order,
            determinant: serial.determinant,
            exec_time_ms: serial.serial_time_ms,
            serial: true,
        },
        ExecutionRecord {
            matrix: matrix_name,
            order,
            determinant: parallel.value,
            exec_time_ms: parallel.elapsed_ms,
            serial: false,
        },
    ])
}
