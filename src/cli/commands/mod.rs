use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use crate::config::DetscaleConfig;

use super::Output;

pub mod config;
pub mod run;
pub mod scale;

#[derive(Parser)]
#[command(
    name = "detscale",
    version = crate::VERSION,
    about = "Parallel cofactor-expansion determinants and scaling experiments",
    long_about = "detscale computes determinants by cofactor expansion, serially and with the \
                  top-level minors spread over worker threads, and measures strong (Amdahl) \
                  and weak (Gustafson) scaling of the parallel version."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute determinants of matrix files serially and in parallel
    Run(run::RunArgs),
    /// Strong scaling: one matrix, increasing worker counts
    Strong(scale::StrongArgs),
    /// Weak scaling: growing matrices, one worker per top-level minor
    Weak(scale::WeakArgs),
    /// Show the merged configuration
    Config(config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Failed to change directory to {dir}"))?;
        }

        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        let Some(command) = self.command else {
            Cli::command().print_help()?;
            return Ok(());
        };

        let config = DetscaleConfig::load(self.config.as_deref())?;
        tracing::debug!("Loaded configuration: {:?}", config);

        match command {
            Commands::Run(args) => run::execute(args, &config, &output),
            Commands::Strong(args) => scale::execute_strong(args, &config, &output),
            Commands::Weak(args) => scale::execute_weak(args, &config, &output),
            Commands::Config(args) => config::execute(args, &config),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
