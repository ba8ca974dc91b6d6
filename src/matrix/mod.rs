//! Square matrix model and minor column sets.
//!
//! A [`Matrix`] is immutable once built. Minors are never materialised: a minor is
//! described by the row it starts at and the ordered [`ColumnIndexSet`] of columns it
//! keeps, and the expansion reads straight from the original matrix.

mod loader;
mod source;

pub use loader::{parse_matrix, read_matrix};
pub use source::{FileMatrixSource, GeneratedMatrixSource, MatrixSource};

use crate::error::{DetResult, DeterminantError};

/// Dense square matrix of reals stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    order: usize,
}

impl Matrix {
    /// Builds a matrix from its rows.
    ///
    /// Fails with `MalformedInput` if there are no rows or any row length differs
    /// from the number of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> DetResult<Self> {
        let order = rows.len();
        if order == 0 {
            return Err(DeterminantError::malformed(0, "matrix must have at least one row"));
        }

        let mut data = Vec::with_capacity(order * order);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != order {
                return Err(DeterminantError::malformed(
                    0,
                    format!(
                        "square matrix required: row {} has {} columns, expected {}",
                        index + 1,
                        row.len(),
                        order
                    ),
                ));
            }
            data.extend(row);
        }

        Ok(Self { data, order })
    }

    /// Creates the `n x n` identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { data, order: n }
    }

    /// Order (number of rows and columns).
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.order && col < self.order {
            Some(self.data[row * self.order + col])
        } else {
            None
        }
    }

    /// Entry at `(row, col)` without the bounds wrapper. Callers validate indices first.
    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.order + col]
    }

    /// Slice of one row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.order;
        &self.data[start..start + self.order]
    }

    /// Iterator over all rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.order)
    }

    /// Copy of this matrix with rows `i` and `j` exchanged.
    #[must_use]
    pub fn swap_rows(&self, i: usize, j: usize) -> Self {
        let mut swapped = self.clone();
        if i != j {
            for k in 0..self.order {
                swapped.data.swap(i * self.order + k, j * self.order + k);
            }
        }
        swapped
    }

    /// Copy of this matrix with row `row` multiplied by `factor`.
    #[must_use]
    pub fn scale_row(&self, row: usize, factor: f64) -> Self {
        let mut scaled = self.clone();
        let start = row * self.order;
        for value in &mut scaled.data[start..start + self.order] {
            *value *= factor;
        }
        scaled
    }
}

/// Ordered, duplicate-free set of column indices selecting the columns of a minor.
///
/// Order matters: it fixes the sign alternation of the expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnIndexSet(Vec<usize>);

impl ColumnIndexSet {
    /// All columns `[0, 1, ..., n-1]`.
    #[must_use]
    pub fn full(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Wraps explicit indices. Validation happens where the set meets a matrix.
    #[must_use]
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Copy of this set with `column` removed, relative order preserved.
    #[must_use]
    pub fn without(&self, column: usize) -> Self {
        Self(self.0.iter().copied().filter(|&c| c != column).collect())
    }

    /// Order of the minor this set selects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}
