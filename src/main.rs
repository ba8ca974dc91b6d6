use anyhow::Result;
use clap::Parser;

use detscale::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
