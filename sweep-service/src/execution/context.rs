// Sweep Configuration
// Explicit run configuration passed into every component that needs it

use crate::summary::SummaryFormat;

use std::path::PathBuf;

/// Configuration for one sweep run.
///
/// Everything the pipeline needs to know about its surroundings lives here;
/// there is no process-wide state or environment lookup inside the service.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Run name, used as the summary file prefix
    pub run_name: String,
    /// Directory summaries are written under
    pub output_dir: PathBuf,
    /// Worker count for both phases; `1` selects the serial fallback
    pub n_procs: usize,
    /// Summary formats to persist; empty writes nothing
    pub summary_formats: Vec<SummaryFormat>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            run_name: "sweep".to_string(),
            output_dir: PathBuf::from("."),
            n_procs: 1,
            summary_formats: vec![SummaryFormat::Csv],
        }
    }
}

impl SweepConfig {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_procs(mut self, n_procs: usize) -> Self {
        self.n_procs = n_procs;
        self
    }

    pub fn with_summary_formats(mut self, formats: Vec<SummaryFormat>) -> Self {
        self.summary_formats = formats;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::default();
        assert_eq!(config.run_name, "sweep");
        assert_eq!(config.n_procs, 1);
        assert_eq!(config.summary_formats, vec![SummaryFormat::Csv]);
    }

    #[test]
    fn test_builders() {
        let config = SweepConfig::new("shelf_break")
            .with_procs(8)
            .with_output_dir("/tmp/out")
            .with_summary_formats(vec![SummaryFormat::Csv, SummaryFormat::Json]);
        assert_eq!(config.run_name, "shelf_break");
        assert_eq!(config.n_procs, 8);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }
}
