// Run Command
// Executes a full two-phase sweep over a matrix specification

use crate::commands::{resolve_source, MatrixFormat};
use crate::output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use color_eyre::Result;

use sweep_service::{
    progress_channel, ArtifactGenerator, JsonDumpGenerator, LogLevel, NullGenerator,
    SummaryFormat, SweepConfig, SweepEvent, SweepRunner,
};

/// Run a sweep over a matrix specification
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the matrix specification (tabular .csv/.txt or nested .yml)
    pub matrix: PathBuf,

    /// Matrix format (default: inferred from the file extension)
    #[arg(long, value_enum)]
    pub format: Option<MatrixFormat>,

    /// Worker count; 1 runs the serial fallback
    #[arg(long, short = 'j', value_name = "N", default_value_t = 1)]
    pub procs: usize,

    /// Run name, used as the summary file prefix
    #[arg(long, value_name = "RUN", default_value = "sweep")]
    pub name: String,

    /// Output directory for trial artifacts and summaries
    #[arg(long, short = 'o', value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Summary formats to write (comma separated: csv, json)
    #[arg(long, value_name = "FMT", value_delimiter = ',', default_value = "csv")]
    pub summary: Vec<String>,

    /// Validate and summarize without writing trial artifacts
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    if !args.matrix.exists() {
        color_eyre::eyre::bail!("Matrix file not found: {}", args.matrix.display());
    }
    if args.procs == 0 {
        color_eyre::eyre::bail!("--procs must be at least 1");
    }

    let mut formats = Vec::new();
    for raw in &args.summary {
        let format: SummaryFormat = raw
            .parse()
            .map_err(|e: String| color_eyre::eyre::eyre!(e))?;
        formats.push(format);
    }

    let source = resolve_source(&args.matrix, args.format)?;

    output::status("Running", &format!("{}", args.matrix.display()));

    let config = SweepConfig::new(args.name.as_str())
        .with_procs(args.procs)
        .with_output_dir(&args.out)
        .with_summary_formats(formats);

    let generator: Arc<dyn ArtifactGenerator> = if args.dry_run {
        Arc::new(NullGenerator)
    } else {
        Arc::new(JsonDumpGenerator::new(args.out.join("trials")))
    };

    let (tx, mut rx) = progress_channel();
    let runner = SweepRunner::new(config)
        .with_generator(generator)
        .with_progress(tx);

    // Run in the background; render progress in the foreground.
    let handle = tokio::spawn(async move { runner.run(&source).await });

    while let Some(event) = rx.recv().await {
        match event {
            SweepEvent::ValidateStarted { total, workers } => {
                output::header(&format!(
                    "Validating {} combinations ({} worker{})",
                    total,
                    workers,
                    if workers == 1 { "" } else { "s" }
                ));
            }
            SweepEvent::CombinationFailed { combo_num, filter } => {
                output::warning(&format!(
                    "combination {:05} rejected by '{}'",
                    combo_num, filter
                ));
            }
            SweepEvent::ValidateCompleted {
                passed,
                failed,
                duration,
            } => {
                output::check(&format!(
                    "Validation: {} passed, {} failed ({:.2}s)",
                    passed,
                    failed,
                    duration.as_secs_f64()
                ));
            }
            SweepEvent::GenerateStarted { total, workers } => {
                output::header(&format!(
                    "Generating {} trial(s) ({} worker{})",
                    total,
                    workers,
                    if workers == 1 { "" } else { "s" }
                ));
            }
            SweepEvent::TrialCompleted {
                trial_num,
                combo_num,
            } => {
                output::dim(&format!(
                    "  trial {:05} (combination {:05})",
                    trial_num, combo_num
                ));
            }
            SweepEvent::GenerateCompleted { total, duration } => {
                output::check(&format!(
                    "Generation: {} trial(s) ({:.2}s)",
                    total,
                    duration.as_secs_f64()
                ));
            }
            SweepEvent::SummaryWritten { path } => {
                output::status("Wrote", &format!("{}", path.display()));
            }
            SweepEvent::Log { level, message } => match level {
                LogLevel::Info => output::info(&message),
                LogLevel::Warning => output::warning(&message),
                LogLevel::Error => output::error(&message),
            },
            SweepEvent::CombinationPassed { .. } => {}
        }
    }

    match handle.await? {
        Ok(outcome) => {
            println!();
            output::success(&format!(
                "Sweep '{}' complete: {} combinations, {} trials, {} filtered out",
                args.name, outcome.total_combinations, outcome.trials, outcome.failures
            ));
            Ok(())
        }
        Err(e) => {
            output::error(&e.to_string());
            println!();
            output::failure(&format!("Sweep '{}' aborted", args.name));
            std::process::exit(1);
        }
    }
}
