// Validate Command
// Parses a matrix specification and reports its expansion without running it

use crate::commands::{resolve_source, MatrixFormat};
use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use sweep_service::CombinationGenerator;

/// Validate a matrix specification file
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the matrix specification (tabular .csv/.txt or nested .yml)
    pub matrix: PathBuf,

    /// Matrix format (default: inferred from the file extension)
    #[arg(long, value_enum)]
    pub format: Option<MatrixFormat>,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    if !args.matrix.exists() {
        color_eyre::eyre::bail!("Matrix file not found: {}", args.matrix.display());
    }

    output::status("Validating", &format!("{}", args.matrix.display()));

    let source = resolve_source(&args.matrix, args.format)?;
    let ranges = match source.parse() {
        Ok(ranges) => ranges,
        Err(e) => {
            output::error(&e.message);
            if let Some(location) = &e.location {
                output::info(&format!("  at: {}", location));
            }
            if let Some(suggestion) = &e.suggestion {
                output::info(&format!("  Suggestion: {}", suggestion));
            }
            std::process::exit(1);
        }
    };

    output::check("Matrix specification valid");

    for (name, values) in &ranges {
        output::info(&format!("{}: {} value(s)", name, values.len()));
    }

    let total = CombinationGenerator::count(&ranges);
    output::check(&format!(
        "Expansion: {} parameters, {} combinations",
        ranges.len(),
        total
    ));

    println!();
    output::success("Matrix is valid");

    Ok(())
}
