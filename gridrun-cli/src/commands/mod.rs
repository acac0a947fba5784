// CLI Commands
// Subcommand implementations and shared matrix-source resolution

pub mod run;
pub mod validate;

use std::path::Path;

use clap::ValueEnum;
use color_eyre::Result;

use sweep_service::MatrixSource;

/// Matrix specification format, inferable from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatrixFormat {
    /// Delimited text with VAR/CON/LO/HI/NUM columns
    Tabular,
    /// Nested YAML (category -> parameter -> entry)
    Nested,
}

/// Resolve a matrix path into a source, inferring the format from the file
/// extension when not given explicitly.
pub fn resolve_source(path: &Path, format: Option<MatrixFormat>) -> Result<MatrixSource> {
    let format = match format {
        Some(format) => format,
        None => match path.extension().and_then(|e| e.to_str()) {
            Some("csv") | Some("txt") => MatrixFormat::Tabular,
            Some("yml") | Some("yaml") => MatrixFormat::Nested,
            _ => color_eyre::eyre::bail!(
                "cannot infer matrix format from '{}'; pass --format tabular|nested",
                path.display()
            ),
        },
    };

    Ok(match format {
        MatrixFormat::Tabular => MatrixSource::TabularFile(path.to_path_buf()),
        MatrixFormat::Nested => MatrixSource::NestedFile(path.to_path_buf()),
    })
}
