use crossbeam::channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{DetResult, DeterminantError};

/// How worker partitions are given execution contexts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum ExecutionBackend {
    /// A fresh scoped OS thread per non-inline partition
    #[default]
    #[serde(rename = "threads")]
    #[value(name = "threads")]
    ScopedThreads,
    /// A rayon pool with one thread per partition after the first
    #[serde(rename = "pool")]
    #[value(name = "pool")]
    ThreadPool,
}

/// What a worker sends back once its task list is finished (or abandoned)
#[derive(Debug)]
struct WorkerReport {
    worker_id: usize,
    task_count: usize,
    outcome: DetResult<()>,
}

/// Runs pre-assigned task lists, one execution context per list, and waits for all of them.
///
/// List 0 runs on the calling context; every other list gets its own context. `execute`
/// returns only after every context has finished, which is the single barrier the
/// coordinator relies on. Workers never talk to each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionExecutor {
    backend: ExecutionBackend,
}

impl PartitionExecutor {
    pub fn new(backend: ExecutionBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> ExecutionBackend {
        self.backend
    }

    /// Execute every task of every partition, then join
    ///
    /// `processor` receives the task and the id of the worker running it. The first
    /// failing task stops its own worker; other workers still run to completion before
    /// the error is returned. A panicking worker becomes a `WorkerFailure`.
    pub fn execute<T, F>(&self, partitions: Vec<Vec<T>>, processor: F) -> DetResult<()>
    where
        T: Send,
        F: Fn(&T, usize) -> DetResult<()> + Sync,
    {
        let worker_count = partitions.len();
        if worker_count == 0 {
            return Ok(());
        }

        let (report_tx, report_rx): (Sender<WorkerReport>, Receiver<WorkerReport>) = unbounded();

        match self.backend {
            ExecutionBackend::ScopedThreads => {
                Self::execute_scoped(partitions, &processor, report_tx)?
            }
            ExecutionBackend::ThreadPool => {
                Self::execute_pooled(partitions, &processor, report_tx)?
            }
        }

        Self::collect_reports(report_rx, worker_count)
    }

    fn execute_scoped<T, F>(
        partitions: Vec<Vec<T>>,
        processor: &F,
        report_tx: Sender<WorkerReport>,
    ) -> DetResult<()>
    where
        T: Send,
        F: Fn(&T, usize) -> DetResult<()> + Sync,
    {
        let mut lists = partitions.into_iter().enumerate();
        let inline = lists.next();

        crossbeam::thread::scope(|s| {
            for (worker_id, tasks) in lists {
                let report_tx = report_tx.clone();
                s.spawn(move |_| {
                    // Receiver outlives the scope, so send cannot fail here
                    let _ = report_tx.send(run_worker(worker_id, &tasks, processor));
                });
            }

            if let Some((worker_id, tasks)) = inline {
                let _ = report_tx.send(run_worker(worker_id, &tasks, processor));
            }
        })
        .map_err(|_| DeterminantError::worker_failure("a worker thread panicked outside its tasks"))
    }

    fn execute_pooled<T, F>(
        partitions: Vec<Vec<T>>,
        processor: &F,
        report_tx: Sender<WorkerReport>,
    ) -> DetResult<()>
    where
        T: Send,
        F: Fn(&T, usize) -> DetResult<()> + Sync,
    {
        // The caller runs list 0 itself, so the pool only needs a thread per remaining list
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(partitions.len().saturating_sub(1).max(1))
            .thread_name(|i| format!("detscale-worker-{}", i + 1))
            .build()
            .map_err(|e| DeterminantError::worker_failure(format!("failed to start worker pool: {e}")))?;

        let mut lists = partitions.into_iter().enumerate();
        let inline = lists.next();

        pool.in_place_scope(|s| {
            for (worker_id, tasks) in lists {
                let report_tx = report_tx.clone();
                s.spawn(move |_| {
                    let _ = report_tx.send(run_worker(worker_id, &tasks, processor));
                });
            }

            if let Some((worker_id, tasks)) = inline {
                let _ = report_tx.send(run_worker(worker_id, &tasks, processor));
            }
        });

        Ok(())
    }

    fn collect_reports(report_rx: Receiver<WorkerReport>, worker_count: usize) -> DetResult<()> {
        // Every context has joined, so everything that will arrive is already queued
        let mut reports: Vec<WorkerReport> = report_rx.try_iter().collect();
        if reports.len() != worker_count {
            return Err(DeterminantError::worker_failure(format!(
                "only {} of {} workers reported back",
                reports.len(),
                worker_count
            )));
        }

        reports.sort_by_key(|report| report.worker_id);
        for report in reports {
            tracing::trace!(
                "Worker {} finished {} tasks (ok: {})",
                report.worker_id,
                report.task_count,
                report.outcome.is_ok()
            );
            report.outcome?;
        }

        Ok(())
    }
}

fn run_worker<T, F>(worker_id: usize, tasks: &[T], processor: &F) -> WorkerReport
where
    F: Fn(&T, usize) -> DetResult<()>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        tasks.iter().try_for_each(|task| processor(task, worker_id))
    }))
    .unwrap_or_else(|payload| {
        Err(DeterminantError::worker_failure(format!(
            "worker {} panicked: {}",
            worker_id,
            panic_message(payload.as_ref())
        )))
    });

    WorkerReport {
        worker_id,
        task_count: tasks.len(),
        outcome,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Number of logical cores on this machine
///
/// Worker counts above this still run correctly, but the extra workers time-share cores
/// so measured speedup flattens out.
pub fn available_cores() -> usize {
    num_cpus::get()
}
