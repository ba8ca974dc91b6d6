//! Write-once slots that workers fill with their top-level minors.

use std::sync::OnceLock;

use crate::error::{DetResult, DeterminantError};

/// Fixed-size buffer with one slot per top-level minor.
///
/// Each slot starts empty and accepts exactly one value. The partition gives every slot
/// to a single task; the buffer turns a violation of that into an error instead of a
/// silent overwrite, and an empty slot after the barrier into a `WorkerFailure`.
#[derive(Debug)]
pub struct ResultsBuffer {
    slots: Vec<OnceLock<f64>>,
}

impl ResultsBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Stores `value` in `slot`.
    pub fn publish(&self, slot: usize, value: f64) -> DetResult<()> {
        let cell = self.slots.get(slot).ok_or_else(|| {
            DeterminantError::worker_failure(format!(
                "slot {} is outside a buffer of {} slots",
                slot,
                self.slots.len()
            ))
        })?;
        cell.set(value).map_err(|_| {
            DeterminantError::worker_failure(format!("slot {slot} was written more than once"))
        })
    }

    /// Consumes the buffer once every worker has joined.
    ///
    /// Fails with `WorkerFailure` listing the slots nobody wrote.
    pub fn into_values(self) -> DetResult<Vec<f64>> {
        let mut missing = Vec::new();
        let mut values = Vec::with_capacity(self.slots.len());

        for (slot, cell) in self.slots.into_iter().enumerate() {
            match cell.into_inner() {
                Some(value) => values.push(value),
                None => missing.push(slot),
            }
        }

        if missing.is_empty() {
            Ok(values)
        } else {
            Err(DeterminantError::worker_failure(format!(
                "no result was written for slots {missing:?}"
            )))
        }
    }
}
