// Sweep Executor
// Two-phase validate/generate execution over a combination set

use crate::execution::events::{EventSender, ProgressSender, SweepEvent};
use crate::execution::partition::{partition, PartitionError};
use crate::matrix::Combination;
use crate::parser::models::{ParamMap, Scalar};
use crate::pipeline::{DependencyError, DependencySet, FilterSet};
use crate::runners::{ArtifactGenerator, GeneratorError};

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::task;

/// Outcome of validating one combination.
///
/// On success the payload is the fully-resolved combination (original values,
/// broadcast loads, derived values). On failure it is the rejecting filter's
/// explanation with `FILTER` and `COMBO_NUM` injected.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub combo_num: usize,
    pub success: bool,
    pub payload: ParamMap,
}

/// Phase 1 output: every result, partitioned by success, both halves in
/// combo_num order.
#[derive(Debug, Clone, Default)]
pub struct PhaseOneOutcome {
    pub passed: Vec<ValidationResult>,
    pub failed: Vec<ValidationResult>,
}

/// Phase 2 unit of work: a surviving combination renumbered with its trial
/// index. `trial_num` is the identity the artifact generator works with;
/// `combo_num` stays for traceability back to the sweep position.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub trial_num: usize,
    pub combo_num: usize,
    pub values: ParamMap,
}

/// Errors that abort a phase.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("combination {combo_num:05}: {source}")]
    Dependency {
        combo_num: usize,
        #[source]
        source: DependencyError,
    },

    #[error("trial {trial_num:05} (combination {combo_num:05}): {source}")]
    Generator {
        trial_num: usize,
        combo_num: usize,
        #[source]
        source: GeneratorError,
    },

    #[error(transparent)]
    Partition(#[from] PartitionError),

    #[error("worker {worker} panicked: {message}")]
    WorkerPanic { worker: usize, message: String },
}

/// Two-phase executor with a configurable worker count.
///
/// `n_procs == 1` runs everything inline, in input order. With more workers
/// the item list is partitioned into contiguous slices, one task per slice;
/// each worker walks its slice in order, and results are reassembled in
/// slice order, which restores the original combo_num order. Phase 2 never
/// starts before Phase 1 has fully completed, since the pass-set size is
/// not known until then.
pub struct SweepExecutor {
    n_procs: usize,
    event_tx: Option<ProgressSender>,
}

impl SweepExecutor {
    pub fn new(n_procs: usize) -> Self {
        Self {
            n_procs,
            event_tx: None,
        }
    }

    /// Set progress event sender
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Phase 1: resolve and classify every combination.
    ///
    /// A filter rejection is an expected outcome and lands in the fail-set; a
    /// dependency error is not: it aborts the phase. Every spawned worker is
    /// joined before an error surfaces, so no task outlives the phase and all
    /// progress senders are released.
    pub async fn validate(
        &self,
        combinations: Vec<Combination>,
        load_vars: ParamMap,
        dependencies: Arc<DependencySet>,
        filters: Arc<FilterSet>,
    ) -> Result<PhaseOneOutcome, ExecutionError> {
        let start = Instant::now();
        let total = combinations.len();
        if self.n_procs == 0 {
            return Err(PartitionError {
                items: total,
                workers: 0,
            }
            .into());
        }
        self.event_tx
            .send_event(SweepEvent::validate_started(total, self.n_procs));

        let results = if self.n_procs == 1 {
            let mut results = Vec::with_capacity(total);
            for combo in &combinations {
                match validate_one(combo, &load_vars, &dependencies, &filters, &self.event_tx) {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        self.event_tx.send_event(SweepEvent::error(e.to_string()));
                        return Err(e);
                    }
                }
            }
            results
        } else {
            let slices = partition(total, self.n_procs)?;
            let shared = Arc::new(combinations);

            let mut handles = Vec::with_capacity(slices.len());
            for slice in slices {
                let shared = Arc::clone(&shared);
                let load_vars = load_vars.clone();
                let dependencies = Arc::clone(&dependencies);
                let filters = Arc::clone(&filters);
                let tx = self.event_tx.clone();
                handles.push(task::spawn_blocking(move || {
                    let mut out = Vec::with_capacity(slice.len());
                    for combo in &shared[slice.start..slice.end] {
                        out.push(validate_one(combo, &load_vars, &dependencies, &filters, &tx)?);
                    }
                    Ok::<Vec<ValidationResult>, ExecutionError>(out)
                }));
            }

            self.join_workers(handles, total).await?
        };

        let (passed, failed): (Vec<_>, Vec<_>) =
            results.into_iter().partition(|r| r.success);

        self.event_tx.send_event(SweepEvent::validate_completed(
            passed.len(),
            failed.len(),
            start.elapsed(),
        ));

        Ok(PhaseOneOutcome { passed, failed })
    }

    /// Renumber the pass-set with 1-based trial indices, injecting
    /// `TRIAL_NUM` and `COMBO_NUM` so artifacts and summaries can always be
    /// joined back to the sweep.
    pub fn assign_trials(passed: Vec<ValidationResult>) -> Vec<Trial> {
        passed
            .into_iter()
            .enumerate()
            .map(|(i, result)| {
                let trial_num = i + 1;
                let mut values = result.payload;
                values.insert("TRIAL_NUM".to_string(), Scalar::Int(trial_num as i64));
                values.insert(
                    "COMBO_NUM".to_string(),
                    Scalar::Int(result.combo_num as i64),
                );
                Trial {
                    trial_num,
                    combo_num: result.combo_num,
                    values,
                }
            })
            .collect()
    }

    /// Phase 2: hand every trial to the artifact generator.
    ///
    /// The generator's returned attribute map is passed through untouched;
    /// any generator error aborts the phase after all workers are joined.
    pub async fn generate(
        &self,
        trials: Vec<Trial>,
        generator: Arc<dyn ArtifactGenerator>,
    ) -> Result<Vec<ParamMap>, ExecutionError> {
        let start = Instant::now();
        let total = trials.len();
        if self.n_procs == 0 {
            return Err(PartitionError {
                items: total,
                workers: 0,
            }
            .into());
        }
        self.event_tx
            .send_event(SweepEvent::generate_started(total, self.n_procs));

        let attrs = if self.n_procs == 1 {
            let mut attrs = Vec::with_capacity(total);
            for trial in &trials {
                match generate_one(trial, &generator, &self.event_tx).await {
                    Ok(a) => attrs.push(a),
                    Err(e) => {
                        self.event_tx.send_event(SweepEvent::error(e.to_string()));
                        return Err(e);
                    }
                }
            }
            attrs
        } else {
            let slices = partition(total, self.n_procs)?;
            let shared = Arc::new(trials);

            let mut handles = Vec::with_capacity(slices.len());
            for slice in slices {
                let shared = Arc::clone(&shared);
                let generator = Arc::clone(&generator);
                let tx = self.event_tx.clone();
                handles.push(task::spawn(async move {
                    let mut out = Vec::with_capacity(slice.len());
                    for trial in &shared[slice.start..slice.end] {
                        out.push(generate_one(trial, &generator, &tx).await?);
                    }
                    Ok::<Vec<ParamMap>, ExecutionError>(out)
                }));
            }

            self.join_workers(handles, total).await?
        };

        self.event_tx
            .send_event(SweepEvent::generate_completed(total, start.elapsed()));

        Ok(attrs)
    }

    /// Join every worker, concatenating slice results in slice order. The
    /// first error (by slice order) is kept and surfaced only after all
    /// workers have finished.
    async fn join_workers<T>(
        &self,
        handles: Vec<task::JoinHandle<Result<Vec<T>, ExecutionError>>>,
        total: usize,
    ) -> Result<Vec<T>, ExecutionError> {
        let mut merged = Vec::with_capacity(total);
        let mut first_err: Option<ExecutionError> = None;

        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(mut slice_results)) => merged.append(&mut slice_results),
                Ok(Err(e)) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
                Err(join_err) => {
                    if first_err.is_none() {
                        first_err = Some(ExecutionError::WorkerPanic {
                            worker,
                            message: join_err.to_string(),
                        });
                    }
                }
            }
        }

        match first_err {
            Some(e) => {
                self.event_tx.send_event(SweepEvent::error(e.to_string()));
                Err(e)
            }
            None => Ok(merged),
        }
    }
}

/// Validate a single combination: merge broadcast loads, derive dependent
/// values, then classify through the filters.
fn validate_one(
    combo: &Combination,
    load_vars: &ParamMap,
    dependencies: &DependencySet,
    filters: &FilterSet,
    tx: &Option<ProgressSender>,
) -> Result<ValidationResult, ExecutionError> {
    let mut merged = combo.values.clone();
    for (key, value) in load_vars {
        merged.insert(key.clone(), value.clone());
    }

    let resolved = dependencies
        .apply(&merged)
        .map_err(|source| ExecutionError::Dependency {
            combo_num: combo.combo_num,
            source,
        })?;

    match filters.apply(&resolved) {
        Some(failure) => {
            tx.send_event(SweepEvent::combination_failed(
                combo.combo_num,
                failure.filter.clone(),
            ));
            let mut payload = failure.explanation;
            payload.insert("FILTER".to_string(), Scalar::Text(failure.filter));
            payload.insert(
                "COMBO_NUM".to_string(),
                Scalar::Int(combo.combo_num as i64),
            );
            Ok(ValidationResult {
                combo_num: combo.combo_num,
                success: false,
                payload,
            })
        }
        None => {
            tx.send_event(SweepEvent::combination_passed(combo.combo_num));
            Ok(ValidationResult {
                combo_num: combo.combo_num,
                success: true,
                payload: resolved,
            })
        }
    }
}

async fn generate_one(
    trial: &Trial,
    generator: &Arc<dyn ArtifactGenerator>,
    tx: &Option<ProgressSender>,
) -> Result<ParamMap, ExecutionError> {
    let attrs = generator
        .generate(trial)
        .await
        .map_err(|source| ExecutionError::Generator {
            trial_num: trial.trial_num,
            combo_num: trial.combo_num,
            source,
        })?;
    tx.send_event(SweepEvent::trial_completed(trial.trial_num, trial.combo_num));
    Ok(attrs)
}
