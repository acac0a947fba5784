// JSON Dump Generator
// Reference artifact generator: one JSON document per surviving trial

use crate::execution::executor::Trial;
use crate::parser::models::{ParamMap, Scalar};
use crate::runners::{ArtifactGenerator, GeneratorError};

use std::path::PathBuf;

use async_trait::async_trait;

/// Generator that writes each resolved trial as `trial_{trial_num:05}.json`
/// under a target directory.
///
/// The returned attribute map is the trial's values plus a `TITLE` in the
/// `input_{trial_num:05}` naming convention and the written artifact path.
pub struct JsonDumpGenerator {
    target_dir: PathBuf,
}

impl JsonDumpGenerator {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }
}

#[async_trait]
impl ArtifactGenerator for JsonDumpGenerator {
    async fn generate(&self, trial: &Trial) -> Result<ParamMap, GeneratorError> {
        let mut attrs = trial.values.clone();
        attrs.insert(
            "TITLE".to_string(),
            Scalar::Text(format!("input_{:05}", trial.trial_num)),
        );

        let path = self
            .target_dir
            .join(format!("trial_{:05}.json", trial.trial_num));
        let body = serde_json::to_string_pretty(&attrs)?;
        std::fs::create_dir_all(&self.target_dir)?;
        std::fs::write(&path, body)?;

        attrs.insert(
            "ARTIFACT_PATH".to_string(),
            Scalar::Text(path.display().to_string()),
        );
        Ok(attrs)
    }
}
