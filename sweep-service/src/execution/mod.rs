// Execution Engine Module
// Work partitioning, two-phase orchestration, and progress events

pub mod context;
pub mod events;
pub mod executor;
pub mod partition;

// Re-export key types
pub use context::SweepConfig;
pub use events::{progress_channel, EventSender, LogLevel, ProgressReceiver, ProgressSender, SweepEvent};
pub use executor::{ExecutionError, PhaseOneOutcome, SweepExecutor, Trial, ValidationResult};
pub use partition::{partition, PartitionError, Slice};
