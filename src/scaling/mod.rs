//! Strong and weak scaling experiments.
//!
//! Each experiment times the serial expansion as a baseline, splits that time into a
//! serial share and a parallel share, runs the distributed expansion, and sets the
//! achieved speedup against the theoretical bound:
//!
//! - **Strong scaling** (fixed order, growing worker count) uses Amdahl's law,
//!   `1 / (s + p / workers)`.
//! - **Weak scaling** (order grows with the worker count) uses Gustafson's law,
//!   `s + p * workers`.
//!
//! The two experiments source their shares differently. Strong scaling measures the
//! shares once from a single baseline and reuses them for every worker count; weak
//! scaling measures them again for every order. See [`ShareSource`].

use serde::Serialize;

use crate::determinant::{ParallelCoordinator, SerialRun, det_serial};
use crate::error::{DetResult, DeterminantError};
use crate::matrix::{Matrix, MatrixSource};
use crate::parallel::ExecutionBackend;

/// One row of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingResult {
    pub matrix_order: usize,
    pub worker_count: usize,
    pub serial_time_ms: f64,
    pub parallel_time_ms: f64,
    pub achieved_speedup: f64,
    pub theoretical_max_speedup: f64,
}

/// Serial and parallel fractions of the serial running time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkShares {
    pub serial_share: f64,
    pub parallel_share: f64,
}

impl WorkShares {
    /// Shares from a timed serial run. A run too fast to register has no parallel share.
    #[must_use]
    pub fn from_serial_run(run: &SerialRun) -> Self {
        let parallel_share = if run.serial_time_ms > 0.0 {
            (run.parallelizable_time_ms / run.serial_time_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            serial_share: 1.0 - parallel_share,
            parallel_share,
        }
    }
}

/// Amdahl bound for a fixed problem on `workers` workers.
#[must_use]
pub fn amdahl_speedup(shares: WorkShares, workers: usize) -> f64 {
    1.0 / (shares.serial_share + shares.parallel_share / workers as f64)
}

/// Gustafson bound when the problem grows with `workers`.
#[must_use]
pub fn gustafson_speedup(shares: WorkShares, workers: usize) -> f64 {
    shares.serial_share + shares.parallel_share * workers as f64
}

/// Which kind of experiment produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingKind {
    Strong,
    Weak,
}

/// Where an experiment's work shares come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareSource {
    /// Measured once from one serial baseline, reused for every worker count
    Baseline,
    /// Measured afresh for every matrix order
    PerOrder,
}

impl ScalingKind {
    #[must_use]
    pub fn share_source(self) -> ShareSource {
        match self {
            ScalingKind::Strong => ShareSource::Baseline,
            ScalingKind::Weak => ShareSource::PerOrder,
        }
    }

    #[must_use]
    pub fn law(self) -> &'static str {
        match self {
            ScalingKind::Strong => "Amdahl",
            ScalingKind::Weak => "Gustafson",
        }
    }
}

/// Runs scaling experiments on one execution backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalingHarness {
    coordinator: ParallelCoordinator,
}

impl ScalingHarness {
    pub fn new(backend: ExecutionBackend) -> Self {
        Self {
            coordinator: ParallelCoordinator::new(backend),
        }
    }

    /// Fixed matrix, worker counts `2..=max_workers`.
    ///
    /// `max_workers` above the matrix order fails with `InvalidPartition` before any
    /// timing starts; below 2 there is nothing to run and the result is empty.
    /// `progress` receives `(completed, total)` after every worker count.
    pub fn run_strong_scaling<P>(
        &self,
        matrix: &Matrix,
        max_workers: usize,
        progress: Option<P>,
    ) -> DetResult<Vec<ScalingResult>>
    where
        P: Fn(usize, usize),
    {
        let n = matrix.order();
        if max_workers > n {
            return Err(DeterminantError::InvalidPartition {
                workers: max_workers,
                order: n,
            });
        }

        let kind = ScalingKind::Strong;
        let mut measured = None;
        let baseline = serial_baseline(kind, &mut measured, matrix);
        tracing::info!(
            "Strong scaling baseline for order {}: {:.3} ms serial, parallel share {:.4}",
            n,
            baseline.serial_time_ms,
            WorkShares::from_serial_run(&baseline).parallel_share
        );

        let worker_counts: Vec<usize> = (2..=max_workers).collect();
        let total = worker_counts.len();
        let mut results = Vec::with_capacity(total);

        for (index, workers) in worker_counts.into_iter().enumerate() {
            let baseline = serial_baseline(kind, &mut measured, matrix);
            let shares = WorkShares::from_serial_run(&baseline);
            let run = self.coordinator.compute(matrix, workers)?;
            check_agreement(baseline.determinant, run.value, n, workers);

            let result = ScalingResult {
                matrix_order: n,
                worker_count: workers,
                serial_time_ms: baseline.serial_time_ms,
                parallel_time_ms: run.elapsed_ms,
                achieved_speedup: baseline.serial_time_ms / run.elapsed_ms,
                theoretical_max_speedup: amdahl_speedup(shares, workers),
            };
            log_result(kind, &result);
            results.push(result);

            if let Some(report) = &progress {
                report(index + 1, total);
            }
        }

        Ok(results)
    }

    /// One matrix per order in `orders`, each computed with as many workers as its order.
    ///
    /// Serial time and work shares are measured again for every order.
    pub fn run_weak_scaling<S, P>(
        &self,
        source: &S,
        orders: &[usize],
        progress: Option<P>,
    ) -> DetResult<Vec<ScalingResult>>
    where
        S: MatrixSource + ?Sized,
        P: Fn(usize, usize),
    {
        let kind = ScalingKind::Weak;
        let total = orders.len();
        let mut results = Vec::with_capacity(total);
        let mut measured = None;

        for (index, &n) in orders.iter().enumerate() {
            let matrix = source.matrix_of_order(n)?;
            let baseline = serial_baseline(kind, &mut measured, &matrix);
            let shares = WorkShares::from_serial_run(&baseline);

            let run = self.coordinator.compute(&matrix, n)?;
            check_agreement(baseline.determinant, run.value, n, n);

            let result = ScalingResult {
                matrix_order: n,
                worker_count: n,
                serial_time_ms: baseline.serial_time_ms,
                parallel_time_ms: run.elapsed_ms,
                achieved_speedup: baseline.serial_time_ms / run.elapsed_ms,
                theoretical_max_speedup: gustafson_speedup(shares, n),
            };
            log_result(kind, &result);
            results.push(result);

            if let Some(report) = &progress {
                report(index + 1, total);
            }
        }

        Ok(results)
    }
}

/// Strong scaling on the default backend without progress reporting.
pub fn run_strong_scaling(matrix: &Matrix, max_workers: usize) -> DetResult<Vec<ScalingResult>> {
    ScalingHarness::default().run_strong_scaling(matrix, max_workers, None::<fn(usize, usize)>)
}

/// Weak scaling on the default backend without progress reporting.
pub fn run_weak_scaling<S>(source: &S, orders: &[usize]) -> DetResult<Vec<ScalingResult>>
where
    S: MatrixSource + ?Sized,
{
    ScalingHarness::default().run_weak_scaling(source, orders, None::<fn(usize, usize)>)
}

/// Serial run whose shares feed the next bound, following `kind`'s share policy.
///
/// `ShareSource::Baseline` measures on the first call and returns that run afterwards;
/// `ShareSource::PerOrder` measures `matrix` on every call.
fn serial_baseline(kind: ScalingKind, measured: &mut Option<SerialRun>, matrix: &Matrix) -> SerialRun {
    match (kind.share_source(), *measured) {
        (ShareSource::Baseline, Some(run)) => run,
        _ => {
            let run = det_serial(matrix);
            *measured = Some(run);
            run
        }
    }
}

fn check_agreement(serial: f64, parallel: f64, order: usize, workers: usize) {
    // Both paths do identical arithmetic, so any difference points at a broken partition
    if serial.to_bits() != parallel.to_bits() && !(serial.is_nan() && parallel.is_nan()) {
        tracing::warn!(
            "Order {} with {} workers: parallel determinant {} differs from serial {}",
            order,
            workers,
            parallel,
            serial
        );
    }
}

fn log_result(kind: ScalingKind, result: &ScalingResult) {
    tracing::info!(
        "{:?} scaling: order {} with {} workers took {:.3} ms (speedup {:.2}, {} bound {:.2}, {:?} shares)",
        kind,
        result.matrix_order,
        result.worker_count,
        result.parallel_time_ms,
        result.achieved_speedup,
        kind.law(),
        result.theoretical_max_speedup,
        kind.share_source()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::GeneratedMatrixSource;

    fn shares(parallel_share: f64) -> WorkShares {
        WorkShares {
            serial_share: 1.0 - parallel_share,
            parallel_share,
        }
    }

    #[test]
    fn test_amdahl_bounds() {
        assert_eq!(amdahl_speedup(shares(1.0), 4), 4.0);
        assert_eq!(amdahl_speedup(shares(0.0), 4), 1.0);
        assert!((amdahl_speedup(shares(0.5), 2) - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_gustafson_bounds() {
        assert_eq!(gustafson_speedup(shares(1.0), 8), 8.0);
        assert_eq!(gustafson_speedup(shares(0.0), 8), 1.0);
        assert!((gustafson_speedup(shares(0.75), 4) - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_shares_from_serial_run() {
        let run = SerialRun {
            determinant: 0.0,
            serial_time_ms: 10.0,
            parallelizable_time_ms: 9.0,
        };
        let s = WorkShares::from_serial_run(&run);
        assert!((s.parallel_share - 0.9).abs() < 1e-12);
        assert!((s.serial_share - 0.1).abs() < 1e-12);

        let instant = SerialRun {
            determinant: 1.0,
            serial_time_ms: 0.0,
            parallelizable_time_ms: 0.0,
        };
        assert_eq!(WorkShares::from_serial_run(&instant).parallel_share, 0.0);
    }

    #[test]
    fn test_strong_scaling_rows() {
        let matrix = GeneratedMatrixSource::new(3).matrix_of_order(6).unwrap();
        let results = run_strong_scaling(&matrix, 4).unwrap();

        let workers: Vec<usize> = results.iter().map(|r| r.worker_count).collect();
        assert_eq!(workers, vec![2, 3, 4]);
        assert!(results.iter().all(|r| r.matrix_order == 6));
        // One baseline shared by every row
        assert!(results.iter().all(|r| r.serial_time_ms == results[0].serial_time_ms));
        assert!(results.iter().all(|r| r.theoretical_max_speedup >= 1.0));
        assert!(results.iter().all(|r| r.theoretical_max_speedup <= r.worker_count as f64 + 1e-9));
    }

    #[test]
    fn test_strong_scaling_rejects_too_many_workers() {
        let matrix = Matrix::identity(3);
        assert!(matches!(
            run_strong_scaling(&matrix, 4),
            Err(DeterminantError::InvalidPartition { workers: 4, order: 3 })
        ));
    }

    #[test]
    fn test_strong_scaling_below_two_workers_is_empty() {
        let matrix = Matrix::identity(3);
        assert!(run_strong_scaling(&matrix, 1).unwrap().is_empty());
    }

    #[test]
    fn test_weak_scaling_rows() {
        let source = GeneratedMatrixSource::new(11);
        let calls = std::cell::Cell::new(0);
        let results = ScalingHarness::new(ExecutionBackend::ThreadPool)
            .run_weak_scaling(&source, &[1, 3, 5], Some(|current: usize, total: usize| {
                assert_eq!(total, 3);
                calls.set(current);
            }))
            .unwrap();

        assert_eq!(calls.get(), 3);
        let orders: Vec<(usize, usize)> = results
            .iter()
            .map(|r| (r.matrix_order, r.worker_count))
            .collect();
        assert_eq!(orders, vec![(1, 1), (3, 3), (5, 5)]);
        assert!(
            results
                .iter()
                .all(|r| r.theoretical_max_speedup >= 1.0 - 1e-12
                    && r.theoretical_max_speedup <= r.worker_count as f64 + 1e-9)
        );
    }

    #[test]
    fn test_weak_scaling_propagates_source_errors() {
        let source = GeneratedMatrixSource::new(0);
        assert!(matches!(
            run_weak_scaling(&source, &[2, 0]),
            Err(DeterminantError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_share_sources_differ_by_kind() {
        assert_eq!(ScalingKind::Strong.share_source(), ShareSource::Baseline);
        assert_eq!(ScalingKind::Weak.share_source(), ShareSource::PerOrder);
        assert_eq!(ScalingKind::Weak.law(), "Gustafson");
    }

    #[test]
    fn test_serial_baseline_follows_share_source() {
        let small = Matrix::identity(2);
        let other = Matrix::identity(3);
        let stale = SerialRun {
            determinant: 7.0,
            serial_time_ms: 1.0e9,
            parallelizable_time_ms: 0.0,
        };

        // Strong reuses whatever was measured first, whatever matrix it is handed
        let mut measured = Some(stale);
        assert_eq!(serial_baseline(ScalingKind::Strong, &mut measured, &other), stale);

        let mut measured = None;
        let first = serial_baseline(ScalingKind::Strong, &mut measured, &small);
        assert_eq!(serial_baseline(ScalingKind::Strong, &mut measured, &other), first);

        // Weak measures the matrix it is given every time
        let mut measured = Some(stale);
        let fresh = serial_baseline(ScalingKind::Weak, &mut measured, &other);
        assert_eq!(fresh.determinant, 1.0);
        assert!(fresh.serial_time_ms < 1.0e9);
        assert_eq!(measured, Some(fresh));
    }
}
