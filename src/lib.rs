//! # detscale - parallel cofactor-expansion determinants
//!
//! Computes determinants by Laplace expansion along the first row, serially and with the
//! top-level minors distributed round-robin over worker threads, and measures how the
//! parallel version scales against Amdahl's and Gustafson's laws.
//!
//! ## Features
//!
//! - **Exact serial/parallel agreement**: both paths combine the same minors in the same order
//! - **Two backends**: crossbeam scoped threads or a rayon thread pool
//! - **Write-once result slots**: missing or duplicated minors are reported, never read as zero
//! - **Scaling experiments**: strong (fixed matrix, more workers) and weak (bigger matrices)
//!
//! ## Quick Start
//!
//! ```bash
//! # Serial and parallel determinants of two files, timings appended to results.csv
//! detscale run matrica3x3.txt matrica8x8.txt results.csv
//!
//! # Strong scaling on a generated 9x9 matrix
//! detscale strong --order 9
//! ```
//!
//! ```rust
//! use detscale::determinant::{compute_parallel, det_serial};
//! use detscale::matrix::Matrix;
//!
//! let m = Matrix::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![0.0, 1.0, 4.0],
//!     vec![5.0, 6.0, 0.0],
//! ])?;
//! assert_eq!(det_serial(&m).determinant, 1.0);
//! assert_eq!(compute_parallel(&m, 2)?.value, 1.0);
//! # Ok::<(), detscale::DeterminantError>(())
//! ```

pub mod cli;
pub mod config;
pub mod determinant;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod profiling;
pub mod reports;
pub mod scaling;

pub use cli::{Cli, Output};
pub use config::DetscaleConfig;
pub use error::{DetResult, DeterminantError};

/// Result type alias for detscale application code
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
