//! Layered configuration for detscale
//!
//! Embedded defaults, then user and working-directory config files, then `DETSCALE_`
//! environment variables, merged with figment.

pub mod core;

pub use self::core::{DataConfig, DetscaleConfig, MatrixSourceKind, ParallelConfig, ScalingConfig};
