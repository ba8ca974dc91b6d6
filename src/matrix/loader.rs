//! Text matrix loader.
//!
//! The first non-blank line holds the order `n`; the next `n` non-blank lines each hold
//! exactly `n` reals separated by whitespace.

use std::path::Path;

use super::Matrix;
use crate::error::{DetResult, DeterminantError};

/// Reads and parses a matrix file.
pub fn read_matrix(path: impl AsRef<Path>) -> DetResult<Matrix> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DeterminantError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let matrix = parse_matrix(&content)?;
    tracing::debug!("Loaded matrix of order {} from {}", matrix.order(), path.display());
    Ok(matrix)
}

/// Parses a matrix from its text form.
pub fn parse_matrix(content: &str) -> DetResult<Matrix> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (order_line, order_text) = lines
        .next()
        .ok_or_else(|| DeterminantError::malformed(0, "input is empty"))?;

    let order: usize = order_text.parse().map_err(|_| {
        DeterminantError::malformed(
            order_line,
            format!("expected the matrix order, found '{order_text}'"),
        )
    })?;
    if order == 0 {
        return Err(DeterminantError::malformed(order_line, "matrix order must be at least 1"));
    }

    // Grows with the rows actually present; the declared order is not trusted for allocation
    let mut rows = Vec::new();
    for row_index in 0..order {
        let (line_number, line) = lines.next().ok_or_else(|| {
            DeterminantError::malformed(
                0,
                format!("expected {order} rows, found {row_index}"),
            )
        })?;

        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    DeterminantError::malformed(line_number, format!("'{token}' is not a number"))
                })
            })
            .collect::<DetResult<Vec<f64>>>()?;

        if row.len() != order {
            return Err(DeterminantError::malformed(
                line_number,
                format!("expected {} numbers, found {}", order, row.len()),
            ));
        }
        rows.push(row);
    }

    if let Some((line_number, _)) = lines.next() {
        tracing::warn!("Ignoring trailing input after row {} (line {})", order, line_number);
    }

    Matrix::from_rows(rows)
}
