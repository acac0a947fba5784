// Sweep Driver
// End-to-end orchestration: parse, expand, validate, generate, summarize

use crate::error::ServiceResult;
use crate::execution::context::SweepConfig;
use crate::execution::events::{EventSender, ProgressSender, SweepEvent};
use crate::execution::executor::SweepExecutor;
use crate::matrix::CombinationGenerator;
use crate::parser::error::ParseResult;
use crate::parser::models::ParamRanges;
use crate::parser::{NestedParser, TabularParser};
use crate::pipeline::{DependencySet, FilterSet, LoadSet};
use crate::runners::{ArtifactGenerator, NullGenerator};
use crate::summary::{SummaryTable, SummaryWriter};

use std::path::PathBuf;
use std::sync::Arc;

/// Where the matrix specification comes from. Exactly one source feeds one
/// run; the tabular and nested forms are never mixed.
#[derive(Debug, Clone)]
pub enum MatrixSource {
    /// Delimited-text file with VAR/CON/LO/HI/NUM columns
    TabularFile(PathBuf),
    /// Tabular text held in memory
    TabularText(String),
    /// Nested YAML file (category -> parameter -> entry)
    NestedFile(PathBuf),
    /// Nested YAML text held in memory
    NestedText(String),
}

impl MatrixSource {
    /// Parse the source into per-parameter value lists.
    pub fn parse(&self) -> ParseResult<ParamRanges> {
        match self {
            MatrixSource::TabularFile(path) => TabularParser::parse_file(path),
            MatrixSource::TabularText(text) => TabularParser::parse_str(text),
            MatrixSource::NestedFile(path) => NestedParser::parse_file(path),
            MatrixSource::NestedText(text) => NestedParser::parse_str(text),
        }
    }
}

/// Result of a completed sweep run.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// Pass-summary: one row per generated trial
    pub pass_summary: SummaryTable,
    /// Fail-summary: one row per filter rejection
    pub fail_summary: SummaryTable,
    /// Size of the full cartesian product
    pub total_combinations: usize,
    /// Number of trials that survived filtering and were generated
    pub trials: usize,
    /// Number of filter rejections
    pub failures: usize,
    /// Summary files written
    pub written: Vec<PathBuf>,
}

/// Orchestrates one full design-matrix sweep.
pub struct SweepRunner {
    config: SweepConfig,
    dependencies: Arc<DependencySet>,
    filters: Arc<FilterSet>,
    loaders: LoadSet,
    generator: Arc<dyn ArtifactGenerator>,
    event_tx: Option<ProgressSender>,
}

impl SweepRunner {
    /// Create a runner with no pipelines and the no-op generator.
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            dependencies: Arc::new(DependencySet::new()),
            filters: Arc::new(FilterSet::new()),
            loaders: LoadSet::new(),
            generator: Arc::new(NullGenerator),
            event_tx: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: DependencySet) -> Self {
        self.dependencies = Arc::new(dependencies);
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = Arc::new(filters);
        self
    }

    pub fn with_loaders(mut self, loaders: LoadSet) -> Self {
        self.loaders = loaders;
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn ArtifactGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Run the sweep end to end.
    ///
    /// Specification and loader errors abort before any combination is
    /// processed; dependency and generator errors abort their phase; filter
    /// rejections accumulate silently into the fail-summary.
    pub async fn run(&self, source: &MatrixSource) -> ServiceResult<SweepOutcome> {
        let ranges = source.parse()?;
        let combinations = CombinationGenerator::generate(&ranges);
        let total_combinations = combinations.len();
        self.event_tx.send_event(SweepEvent::info(format!(
            "expanded {} parameters into {} combinations",
            ranges.len(),
            total_combinations
        )));

        let load_vars = self.loaders.run()?;

        let mut executor = SweepExecutor::new(self.config.n_procs);
        if let Some(tx) = &self.event_tx {
            executor = executor.with_progress(tx.clone());
        }

        let outcome = executor
            .validate(
                combinations,
                load_vars,
                Arc::clone(&self.dependencies),
                Arc::clone(&self.filters),
            )
            .await?;

        let fail_records: Vec<_> = outcome.failed.iter().map(|r| r.payload.clone()).collect();
        let failures = fail_records.len();

        let trials = SweepExecutor::assign_trials(outcome.passed);
        let n_trials = trials.len();

        let attrs = executor
            .generate(trials, Arc::clone(&self.generator))
            .await?;

        let pass_summary = SummaryTable::from_records(&attrs);
        let fail_summary = SummaryTable::from_records(&fail_records);

        let written = SummaryWriter::new(&self.config).write(&pass_summary, &fail_summary)?;
        for path in &written {
            self.event_tx
                .send_event(SweepEvent::summary_written(path.clone()));
        }

        Ok(SweepOutcome {
            pass_summary,
            fail_summary,
            total_combinations,
            trials: n_trials,
            failures,
            written,
        })
    }
}
