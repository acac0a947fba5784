// Artifact Runners Module
// The external artifact-generator boundary and its built-in implementations

pub mod json_dump;

pub use json_dump::JsonDumpGenerator;

use crate::execution::executor::Trial;
use crate::parser::models::ParamMap;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while generating a trial's artifacts
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("artifact generation failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The artifact-generator collaborator boundary.
///
/// Given a fully-resolved trial, a generator may perform arbitrary file I/O
/// and returns a flat attribute map. The sweep core never interprets the
/// returned attributes beyond recording them in the pass-summary.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    async fn generate(&self, trial: &Trial) -> Result<ParamMap, GeneratorError>;
}

/// Generator that produces no artifacts and echoes the trial's attributes.
/// Used for dry runs and tests.
pub struct NullGenerator;

#[async_trait]
impl ArtifactGenerator for NullGenerator {
    async fn generate(&self, trial: &Trial) -> Result<ParamMap, GeneratorError> {
        Ok(trial.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::models::Scalar;

    #[tokio::test]
    async fn test_null_generator_echoes_values() {
        let mut values = ParamMap::new();
        values.insert("H".to_string(), Scalar::Float(1.0));
        let trial = Trial {
            trial_num: 1,
            combo_num: 4,
            values: values.clone(),
        };

        let attrs = NullGenerator.generate(&trial).await.unwrap();
        assert_eq!(attrs, values);
    }
}
