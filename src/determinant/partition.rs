//! Round-robin split of the top-level expansion into per-worker task lists.

use crate::matrix::ColumnIndexSet;

/// One top-level minor and the results slot it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinorTask {
    pub begin_row_index: usize,
    pub column_index_set: ColumnIndexSet,
    pub result_slot: usize,
}

/// Splits the `n` top-level minors across `worker_count` ordered task lists.
///
/// The minor for top-level column `idx` drops that column, starts at row 1, writes to
/// slot `idx`, and goes to worker `idx % worker_count`. Each list is in ascending `idx`.
/// Workers beyond `n` get empty lists. With no workers there are no lists at all.
#[must_use]
pub fn partition(n: usize, worker_count: usize) -> Vec<Vec<MinorTask>> {
    if worker_count == 0 {
        return Vec::new();
    }

    let full = ColumnIndexSet::full(n);
    let mut tasks: Vec<Vec<MinorTask>> = (0..worker_count)
        .map(|worker| Vec::with_capacity(n / worker_count + usize::from(worker < n % worker_count)))
        .collect();

    for idx in 0..n {
        tasks[idx % worker_count].push(MinorTask {
            begin_row_index: 1,
            column_index_set: full.without(idx),
            result_slot: idx,
        });
    }

    tracing::debug!(
        "Partitioned {} top-level minors across {} workers",
        n,
        worker_count
    );
    tasks
}
