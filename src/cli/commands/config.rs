use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::config::DetscaleConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
    pub format: ConfigFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

/// Print the merged configuration
pub fn execute(args: ConfigArgs, config: &DetscaleConfig) -> Result<()> {
    let rendered = match args.format {
        ConfigFormat::Toml => config.to_toml()?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
