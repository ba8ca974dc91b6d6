//! Recursive cofactor (Laplace) expansion along the first active row.
//!
//! The cost is O(n!) multiplications. Minors are recomputed wherever they recur; there
//! is no memoisation and no elimination shortcut.

use std::time::Instant;

use crate::error::{DetResult, DeterminantError};
use crate::matrix::{ColumnIndexSet, Matrix};
use crate::profiling::{Timed, duration_ms};

/// Value of the minor starting at `begin_row_index` over `columns`.
///
/// Fails with `InvalidMinor` when `columns` is empty, repeats an index, refers to a
/// column outside the matrix, or needs more rows than remain below `begin_row_index`.
pub fn compute_minor(
    matrix: &Matrix,
    begin_row_index: usize,
    columns: &ColumnIndexSet,
) -> DetResult<f64> {
    validate_minor(matrix, begin_row_index, columns)?;
    Ok(expand(matrix, begin_row_index, columns))
}

/// Determinant of the whole matrix: the minor at row 0 over every column.
#[must_use]
pub fn determinant(matrix: &Matrix) -> f64 {
    expand(matrix, 0, &ColumnIndexSet::full(matrix.order()))
}

/// Outcome of a timed serial determinant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialRun {
    pub determinant: f64,
    /// Whole call, including building the column set and the final combination
    pub serial_time_ms: f64,
    /// Time spent evaluating the top-level minors only
    pub parallelizable_time_ms: f64,
}

/// Serial determinant with the top-level minor evaluation timed separately.
///
/// The top-level minors are exactly the work the parallel path distributes, so their
/// share of the total time is the parallel fraction fed into Amdahl and Gustafson.
#[must_use]
pub fn det_serial(matrix: &Matrix) -> SerialRun {
    let start = Instant::now();
    let columns = ColumnIndexSet::full(matrix.order());

    let (determinant, parallelizable_time_ms) = if columns.len() == 1 {
        (matrix.at(0, 0), 0.0)
    } else {
        let minors = Timed::measure(|| {
            columns
                .iter()
                .map(|col| expand(matrix, 1, &columns.without(col)))
                .collect::<Vec<f64>>()
        });
        (combine_first_row(matrix, &minors.value), minors.elapsed_ms)
    };

    SerialRun {
        determinant,
        serial_time_ms: duration_ms(start.elapsed()),
        parallelizable_time_ms,
    }
}

/// Signed sum of `matrix[0][idx] * minors[idx]`, sign alternating from +1.
pub(crate) fn combine_first_row(matrix: &Matrix, minors: &[f64]) -> f64 {
    let mut result = 0.0;
    let mut sign = 1.0;
    for (idx, minor) in minors.iter().enumerate() {
        result += sign * matrix.at(0, idx) * minor;
        sign = -sign;
    }
    result
}

fn expand(matrix: &Matrix, begin_row_index: usize, columns: &ColumnIndexSet) -> f64 {
    if columns.len() == 1 {
        return matrix.at(begin_row_index, columns.as_slice()[0]);
    }

    let mut result = 0.0;
    let mut sign = 1.0;
    for col in columns.iter() {
        let sub = expand(matrix, begin_row_index + 1, &columns.without(col));
        result += sign * matrix.at(begin_row_index, col) * sub;
        sign = -sign;
    }
    result
}

fn validate_minor(matrix: &Matrix, begin_row_index: usize, columns: &ColumnIndexSet) -> DetResult<()> {
    let n = matrix.order();

    if columns.is_empty() {
        return Err(DeterminantError::invalid_minor("column index set is empty"));
    }
    if let Some(col) = columns.iter().find(|&col| col >= n) {
        return Err(DeterminantError::invalid_minor(format!(
            "column {col} is outside a matrix of order {n}"
        )));
    }
    let mut seen = vec![false; n];
    for col in columns.iter() {
        if std::mem::replace(&mut seen[col], true) {
            return Err(DeterminantError::invalid_minor(format!(
                "column {col} appears more than once"
            )));
        }
    }
    if begin_row_index + columns.len() > n {
        return Err(DeterminantError::invalid_minor(format!(
            "a minor of order {} starting at row {} needs more than the {} rows available",
            columns.len(),
            begin_row_index,
            n
        )));
    }

    Ok(())
}
