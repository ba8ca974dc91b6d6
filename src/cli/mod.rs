//! Command-line interface for detscale
//!
//! Argument parsing with clap derive, one module per subcommand, and a small styled
//! output layer shared by all of them.

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
