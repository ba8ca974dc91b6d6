//! Determinants by cofactor expansion, serial and distributed.
//!
//! The serial path expands recursively along the first active row. The parallel path
//! expands the first row once, hands the `n` top-level minors to workers round-robin,
//! joins, and combines the minors along row 0 exactly as the serial path does, so both
//! paths perform the same floating-point operations in the same order.

mod coordinator;
mod expansion;
mod partition;
mod results;

pub use coordinator::{ParallelCoordinator, compute_parallel};
pub use expansion::{SerialRun, compute_minor, det_serial, determinant};
pub use partition::{MinorTask, partition};
pub use results::ResultsBuffer;
