//! Where experiments get a matrix of a given order from.

use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Matrix, read_matrix};
use crate::error::DetResult;

/// Supplies a matrix for each order a weak-scaling experiment visits.
pub trait MatrixSource {
    fn matrix_of_order(&self, order: usize) -> DetResult<Matrix>;
}

/// Loads `template` with every `{n}` replaced by the order,
/// e.g. `test_data/matrica{n}x{n}.txt`.
#[derive(Debug, Clone)]
pub struct FileMatrixSource {
    template: String,
}

impl FileMatrixSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Path the template expands to for `order`.
    #[must_use]
    pub fn path_for(&self, order: usize) -> PathBuf {
        PathBuf::from(self.template.replace("{n}", &order.to_string()))
    }
}

impl MatrixSource for FileMatrixSource {
    fn matrix_of_order(&self, order: usize) -> DetResult<Matrix> {
        read_matrix(self.path_for(order))
    }
}

/// Deterministic pseudo-random matrices: entries in `[-10, 10)` with one decimal.
///
/// The same seed and order always produce the same matrix.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedMatrixSource {
    seed: u64,
}

impl GeneratedMatrixSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MatrixSource for GeneratedMatrixSource {
    fn matrix_of_order(&self, order: usize) -> DetResult<Matrix> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(order as u64));
        let rows = (0..order)
            .map(|_| {
                (0..order)
                    .map(|_| f64::from(rng.gen_range(-100_i32..100)) / 10.0)
                    .collect()
            })
            .collect();
        Matrix::from_rows(rows)
    }
}
