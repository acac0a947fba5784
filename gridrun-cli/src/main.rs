// gridrun
// Command-line driver for design-matrix sweeps

mod commands;
mod output;

use clap::{Parser, Subcommand};
use color_eyre::Result;

#[derive(Parser, Debug)]
#[command(
    name = "gridrun",
    version,
    about = "Expand a design matrix and run a two-phase validate/generate sweep",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a matrix specification and report its expansion
    Validate(commands::validate::ValidateArgs),
    /// Run a full sweep over a matrix specification
    Run(commands::run::RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Run(args) => commands::run::execute(args).await,
    }
}
