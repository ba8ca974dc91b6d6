//! Structured execution of pre-partitioned work
//!
//! This module knows how to run a set of task lists side by side and wait for all of
//! them. It knows nothing about matrices.
//!
//! # Responsibilities
//!
//! ## What This Module Does:
//! - **Execution contexts**: one per task list, with list 0 run by the caller
//! - **Backends**: crossbeam scoped threads or a rayon pool, both with list 0 on the caller
//! - **Join barrier**: `execute` returns only after every context has finished
//! - **Failure capture**: task errors and worker panics come back as `WorkerFailure`
//! - **Resource discovery**: logical core count via `num_cpus`
//!
//! ## What This Module Does NOT Do:
//! - **Partitioning**: callers decide which task goes to which worker
//! - **Load balancing**: a worker only ever runs its own list
//! - **Cancellation or timeouts**: a hung worker blocks the barrier
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ Coordinator  │    │ PartitionExecutor│    │ Workers 1..p │
//! │              │───▶│                  │───▶│              │
//! │ • partitions │    │ • spawn p-1      │    │ • own tasks  │
//! │ • combine    │◀───│ • run list 0     │◀───│ • report     │
//! │   after join │    │ • join barrier   │    │   outcome    │
//! └──────────────┘    └──────────────────┘    └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use detscale::parallel::{ExecutionBackend, PartitionExecutor};
//!
//! let executor = PartitionExecutor::new(ExecutionBackend::ScopedThreads);
//! let partitions = vec![vec![1, 3], vec![2]];
//! executor.execute(partitions, |_task, _worker_id| Ok(())).unwrap();
//! ```

pub mod core;
pub mod progress;

pub use self::core::{ExecutionBackend, PartitionExecutor, available_cores};
pub use self::progress::ExperimentProgress;
