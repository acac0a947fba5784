// Combination Pipelines
// Dependency derivation, filtering, and load-once parameter handling

pub mod dependency;
pub mod filter;
pub mod load;

pub use dependency::{named_dependency, DependencyError, DependencyFn, DependencySet};
pub use filter::{named_filter, FilterFailure, FilterFn, FilterSet};
pub use load::{named_loader, LoadError, LoadFn, LoadSet};
