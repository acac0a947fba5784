// Summary Writer
// Persists pass/fail summary tables in the configured output formats

use crate::execution::context::SweepConfig;
use crate::summary::table::SummaryTable;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Output format for persisted summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Delimited text, one row per record
    Csv,
    /// Column-oriented JSON (column name -> value array)
    Json,
}

impl SummaryFormat {
    fn extension(&self) -> &'static str {
        match self {
            SummaryFormat::Csv => "csv",
            SummaryFormat::Json => "json",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryFormat::Csv => write!(f, "csv"),
            SummaryFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" | "delimited" => Ok(SummaryFormat::Csv),
            "json" | "columnar" => Ok(SummaryFormat::Json),
            _ => Err(format!(
                "Unknown summary format '{}'. Valid formats: csv, json",
                s
            )),
        }
    }
}

/// Errors that can occur while persisting summaries
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writer for the pass/fail summary pair.
///
/// File names derive from the configured run name:
/// `{run_name}_input_summary.{ext}` for the pass-summary and
/// `{run_name}_failure_summary.{ext}` for the fail-summary. An empty format
/// set writes nothing.
pub struct SummaryWriter {
    output_dir: PathBuf,
    run_name: String,
    formats: Vec<SummaryFormat>,
}

impl SummaryWriter {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            run_name: config.run_name.clone(),
            formats: config.summary_formats.clone(),
        }
    }

    /// Persist both tables in every configured format, returning the paths
    /// written.
    pub fn write(
        &self,
        pass: &SummaryTable,
        fail: &SummaryTable,
    ) -> Result<Vec<PathBuf>, SummaryError> {
        if self.formats.is_empty() {
            return Ok(Vec::new());
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|source| SummaryError::Io {
            path: self.output_dir.clone(),
            source,
        })?;

        let mut written = Vec::new();
        for format in &self.formats {
            written.push(self.write_table(pass, "input_summary", *format)?);
            written.push(self.write_table(fail, "failure_summary", *format)?);
        }
        Ok(written)
    }

    fn write_table(
        &self,
        table: &SummaryTable,
        role: &str,
        format: SummaryFormat,
    ) -> Result<PathBuf, SummaryError> {
        let path = self.output_dir.join(format!(
            "{}_{}.{}",
            self.run_name,
            role,
            format.extension()
        ));

        let body = match format {
            SummaryFormat::Csv => table.to_csv(),
            SummaryFormat::Json => serde_json::to_string_pretty(&table.to_columnar_json())?,
        };

        write_file(&path, &body)?;
        Ok(path)
    }
}

fn write_file(path: &Path, body: &str) -> Result<(), SummaryError> {
    std::fs::write(path, body).map_err(|source| SummaryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::{ParamMap, Scalar};
    use tempfile::TempDir;

    fn tables() -> (SummaryTable, SummaryTable) {
        let mut pass_row = ParamMap::new();
        pass_row.insert("H".to_string(), Scalar::Float(1.0));
        pass_row.insert("TRIAL_NUM".to_string(), Scalar::Int(1));
        let pass = SummaryTable::from_records(&[pass_row]);
        let fail = SummaryTable::from_records(&[]);
        (pass, fail)
    }

    #[test]
    fn test_format_round_trips_from_str() {
        assert_eq!("csv".parse::<SummaryFormat>().unwrap(), SummaryFormat::Csv);
        assert_eq!(
            "columnar".parse::<SummaryFormat>().unwrap(),
            SummaryFormat::Json
        );
        assert!("parquet".parse::<SummaryFormat>().is_err());
    }

    #[test]
    fn test_writes_both_tables_per_format() {
        let dir = TempDir::new().unwrap();
        let config = SweepConfig::new("shoal")
            .with_output_dir(dir.path())
            .with_summary_formats(vec![SummaryFormat::Csv, SummaryFormat::Json]);
        let (pass, fail) = tables();

        let written = SummaryWriter::new(&config).write(&pass, &fail).unwrap();

        assert_eq!(written.len(), 4);
        assert!(dir.path().join("shoal_input_summary.csv").exists());
        assert!(dir.path().join("shoal_failure_summary.csv").exists());
        assert!(dir.path().join("shoal_input_summary.json").exists());
        assert!(dir.path().join("shoal_failure_summary.json").exists());

        let csv = std::fs::read_to_string(dir.path().join("shoal_input_summary.csv")).unwrap();
        assert!(csv.starts_with("H,TRIAL_NUM\n"));
    }

    #[test]
    fn test_empty_format_set_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = SweepConfig::new("quiet")
            .with_output_dir(dir.path())
            .with_summary_formats(Vec::new());
        let (pass, fail) = tables();

        let written = SummaryWriter::new(&config).write(&pass, &fail).unwrap();
        assert!(written.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
