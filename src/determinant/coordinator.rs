//! Distributed cofactor expansion: partition, dispatch, join, combine.

use crate::error::{DetResult, DeterminantError};
use crate::matrix::Matrix;
use crate::parallel::{ExecutionBackend, PartitionExecutor, available_cores};
use crate::profiling::Timed;

use super::expansion::{combine_first_row, compute_minor};
use super::partition::{MinorTask, partition};
use super::results::ResultsBuffer;

/// Parallel determinant with the default scoped-thread backend.
///
/// Returns the determinant and the elapsed milliseconds covering partitioning,
/// dispatch, worker execution, the join and the final combination.
pub fn compute_parallel(matrix: &Matrix, worker_count: usize) -> DetResult<Timed<f64>> {
    ParallelCoordinator::new(ExecutionBackend::default()).compute(matrix, worker_count)
}

/// Spreads the top-level minors of one determinant over a fixed number of workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelCoordinator {
    executor: PartitionExecutor,
}

impl ParallelCoordinator {
    pub fn new(backend: ExecutionBackend) -> Self {
        Self {
            executor: PartitionExecutor::new(backend),
        }
    }

    pub fn backend(&self) -> ExecutionBackend {
        self.executor.backend()
    }

    /// Computes `det(matrix)` with `worker_count` workers.
    ///
    /// Fails with `InvalidPartition` before any worker starts when `worker_count` is 0
    /// or exceeds the matrix order, and with `WorkerFailure` when a worker panics or a
    /// slot is left unwritten at the barrier.
    pub fn compute(&self, matrix: &Matrix, worker_count: usize) -> DetResult<Timed<f64>> {
        let n = matrix.order();
        if worker_count == 0 || worker_count > n {
            return Err(DeterminantError::InvalidPartition {
                workers: worker_count,
                order: n,
            });
        }

        let cores = available_cores();
        if worker_count > cores {
            tracing::warn!(
                "{} workers requested but only {} cores available; speedup will saturate",
                worker_count,
                cores
            );
        }

        Timed::measure(|| self.compute_unchecked(matrix, worker_count)).transpose()
    }

    fn compute_unchecked(&self, matrix: &Matrix, worker_count: usize) -> DetResult<f64> {
        let n = matrix.order();
        if n == 1 {
            // No top-level minors to hand out; the entry is the determinant
            return Ok(matrix.at(0, 0));
        }

        self.run_partitions(matrix, partition(n, worker_count))
    }

    /// Dispatches `partitions`, joins, and combines the minors along row 0.
    ///
    /// Every slot `0..n` must be written exactly once across all lists; anything else is
    /// a `WorkerFailure` raised after the join.
    pub(crate) fn run_partitions(
        &self,
        matrix: &Matrix,
        partitions: Vec<Vec<MinorTask>>,
    ) -> DetResult<f64> {
        let worker_count = partitions.len();
        let buffer = ResultsBuffer::new(matrix.order());

        self.executor.execute(partitions, |task: &MinorTask, worker_id| {
            let value = compute_minor(matrix, task.begin_row_index, &task.column_index_set)?;
            tracing::trace!("Worker {} computed minor for slot {}", worker_id, task.result_slot);
            buffer.publish(task.result_slot, value)
        })?;
        tracing::debug!("All {} workers joined", worker_count);

        let minors = buffer.into_values()?;
        Ok(combine_first_row(matrix, &minors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::determinant::determinant;
    use crate::matrix::ColumnIndexSet;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![0.0, 1.0, 4.0],
            vec![5.0, 6.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_sample_for_every_worker_count() {
        let m = sample();
        for workers in 1..=3 {
            let run = compute_parallel(&m, workers).unwrap();
            assert!((run.value - 1.0).abs() < 1e-9, "workers={workers}");
            assert!(run.elapsed_ms >= 0.0);
        }
    }

    #[test]
    fn test_single_entry_matrix() {
        let m = Matrix::from_rows(vec![vec![7.0]]).unwrap();
        assert_eq!(compute_parallel(&m, 1).unwrap().value, 7.0);
    }

    #[test]
    fn test_identity_four_by_four() {
        let m = Matrix::identity(4);
        for backend in [ExecutionBackend::ScopedThreads, ExecutionBackend::ThreadPool] {
            for workers in [1, 2, 4] {
                let run = ParallelCoordinator::new(backend).compute(&m, workers).unwrap();
                assert_eq!(run.value, 1.0, "{backend:?} workers={workers}");
            }
        }
    }

    #[test]
    fn test_matches_serial_expansion() {
        let m = Matrix::from_rows(vec![
            vec![2.5, -1.0, 0.0, 3.0, 1.5],
            vec![4.0, 2.0, -3.5, 1.0, 0.0],
            vec![-2.0, 0.5, 1.0, 6.0, 2.0],
            vec![1.0, 1.0, 1.0, -1.0, 3.0],
            vec![0.0, 7.0, 2.0, 2.0, -4.0],
        ])
        .unwrap();
        let expected = determinant(&m);
        for workers in 1..=5 {
            let actual = compute_parallel(&m, workers).unwrap().value;
            assert!(
                (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
                "workers={workers}: {actual} vs {expected}"
            );
        }
    }

    #[test]
    fn test_invalid_worker_counts() {
        let m = sample();
        for workers in [0, 4] {
            assert!(matches!(
                compute_parallel(&m, workers),
                Err(DeterminantError::InvalidPartition { order: 3, .. })
            ));
        }
    }

    #[test]
    fn test_unwritten_slot_fails_after_join() {
        let m = sample();
        let mut partitions = partition(3, 2);
        // Drop the task for slot 2 from worker 0
        partitions[0].retain(|task| task.result_slot != 2);

        for backend in [ExecutionBackend::ScopedThreads, ExecutionBackend::ThreadPool] {
            match ParallelCoordinator::new(backend).run_partitions(&m, partitions.clone()) {
                Err(DeterminantError::WorkerFailure { reason }) => {
                    assert!(reason.contains("[2]"), "{backend:?}: {reason}")
                }
                other => panic!("{backend:?}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_duplicate_slot_is_worker_failure() {
        let m = sample();
        let mut partitions = partition(3, 2);
        let copy = partitions[1][0].clone();
        partitions[0].push(copy);

        let result = ParallelCoordinator::default().run_partitions(&m, partitions);
        assert!(matches!(
            result,
            Err(DeterminantError::WorkerFailure { ref reason }) if reason.contains("more than once")
        ));
    }

    #[test]
    fn test_failing_task_aborts_compute() {
        let m = sample();
        let mut partitions = partition(3, 3);
        partitions[2][0].column_index_set = ColumnIndexSet::from_indices(Vec::new());

        for backend in [ExecutionBackend::ScopedThreads, ExecutionBackend::ThreadPool] {
            let result = ParallelCoordinator::new(backend).run_partitions(&m, partitions.clone());
            assert!(
                matches!(result, Err(DeterminantError::InvalidMinor { .. })),
                "{backend:?}: {result:?}"
            );
        }
    }

    #[test]
    fn test_pool_backend_reported() {
        let coordinator = ParallelCoordinator::new(ExecutionBackend::ThreadPool);
        assert_eq!(coordinator.backend(), ExecutionBackend::ThreadPool);
    }
}
