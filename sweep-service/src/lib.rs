// Sweep Service Library
// Core service for design-matrix expansion and two-phase sweep execution

pub mod driver;
pub mod error;
pub mod execution;
pub mod matrix;
pub mod parser;
pub mod pipeline;
pub mod runners;
pub mod summary;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};

// Re-export parser types
pub use parser::{
    linspace, NestedParser, ParamMap, ParamRanges, ParseError, ParseErrorKind, ParseResult,
    Scalar, TabularParser,
};

// Re-export matrix types
pub use matrix::{Combination, CombinationGenerator};

// Re-export pipeline types
pub use pipeline::{
    named_dependency, named_filter, named_loader, DependencyError, DependencyFn, DependencySet,
    FilterFailure, FilterFn, FilterSet, LoadError, LoadFn, LoadSet,
};

// Re-export execution types
pub use execution::{
    partition, progress_channel, EventSender, ExecutionError, LogLevel, PartitionError,
    PhaseOneOutcome, ProgressReceiver, ProgressSender, Slice, SweepConfig, SweepEvent,
    SweepExecutor, Trial, ValidationResult,
};

// Re-export runner types
pub use runners::{ArtifactGenerator, GeneratorError, JsonDumpGenerator, NullGenerator};

// Re-export summary types
pub use summary::{SummaryError, SummaryFormat, SummaryTable, SummaryWriter};

// Re-export driver types
pub use driver::{MatrixSource, SweepOutcome, SweepRunner};
