// Service Error
// Crate-level error umbrella for sweep execution

use crate::execution::executor::ExecutionError;
use crate::parser::error::ParseError;
use crate::pipeline::load::LoadError;
use crate::summary::writer::SummaryError;

use thiserror::Error;

/// Any fatal error a sweep run can produce.
///
/// Filter rejections are not errors; they are recorded in the fail-summary
/// and never surface here.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
