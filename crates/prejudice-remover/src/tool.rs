//! Stateless driver for the Kamishima scripts
//!
//! `train` and `predict` each encode the dataset into a fresh scratch
//! matrix, run one script and clean up after themselves. The model file
//! written by the trainer is the only file that outlives a call.

use crate::config::{ToolConfig, validate_eta};
use crate::encoding::EncodedMatrix;
use crate::process::{ToolInvocation, ToolRun};
use crate::schema::OutputSchema;
use crate::scratch::{ScratchFile, ScratchKind};
use fairlab_clock::SystemClock;
use fairlab_core::{ColumnRoles, Dataset, FeaturePolicy, ModelHandle, Predictions};
use fairlab_ports::{Clock, ModelError, ModelResult};
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

/// Runs `train_pr.py` / `predict_lr.py` through the configured interpreter
pub struct KamishimaTool {
    config: ToolConfig,
    schema: OutputSchema,
    clock: Arc<dyn Clock>,
}

impl KamishimaTool {
    pub fn new(config: ToolConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: ToolConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            schema: OutputSchema::default(),
            clock,
        }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Train a model with fairness penalty `eta`
    ///
    /// Runs `<interpreter> <train_script> -e <eta> -i <input> -o <model> --quiet`.
    /// The model file is kept only if the trainer exits cleanly and writes
    /// something to it.
    pub async fn train(
        &self,
        dataset: &Dataset,
        roles: &ColumnRoles,
        policy: FeaturePolicy,
        eta: f64,
    ) -> ModelResult<ModelHandle> {
        validate_eta(eta)?;
        let matrix = EncodedMatrix::encode(dataset, roles, policy)?;

        let work_dir = self.config.work_dir();
        let input = write_matrix(&work_dir, ScratchKind::TrainInput, &matrix).await?;
        let model = ScratchFile::create_in(&self.config.model_dir(), ScratchKind::Model)?;

        let invocation = ToolInvocation::new(&self.config.interpreter)
            .arg(self.config.train_script_path())
            .arg("-e")
            .arg(format!("{:?}", eta))
            .arg("-i")
            .arg(input.path())
            .arg("-o")
            .arg(model.path())
            .arg("--quiet");
        let run = invocation
            .run(self.config.timeout(), self.config.fail_on_stderr)
            .await?;
        log_stdout(&invocation, &run);

        match tokio::fs::metadata(model.path()).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => {
                return Err(ModelError::Decoding(
                    "trainer exited cleanly but wrote no model".to_string(),
                ));
            }
        }
        drop(input);

        let path = model.persist()?;
        info!(
            "Trained prejudice remover (eta={}, sensitive={}, label={}) on {} rows in {:?}: {}",
            eta,
            roles.sensitive,
            roles.label,
            matrix.len(),
            run.elapsed,
            path.display()
        );

        Ok(ModelHandle::new(
            path,
            self.clock.now(),
            eta,
            roles.clone(),
            policy,
            matrix.feature_count(),
        ))
    }

    /// Predict with a previously trained model
    ///
    /// Runs `<interpreter> <predict_script> -i <input> -m <model> -o <output> --quiet`
    /// and decodes the output against the encoded input.
    pub async fn predict(
        &self,
        dataset: &Dataset,
        handle: &ModelHandle,
    ) -> ModelResult<Predictions> {
        if !tokio::fs::try_exists(handle.path()).await? {
            return Err(ModelError::Precondition(format!(
                "model file {} no longer exists",
                handle.path().display()
            )));
        }

        let matrix = EncodedMatrix::encode(dataset, handle.roles(), handle.feature_policy())?;
        if matrix.feature_count() != handle.feature_count() {
            return Err(ModelError::Encoding(format!(
                "model was trained on {} features, dataset has {}",
                handle.feature_count(),
                matrix.feature_count()
            )));
        }

        let work_dir = self.config.work_dir();
        let input = write_matrix(&work_dir, ScratchKind::PredictInput, &matrix).await?;
        let output = ScratchFile::create_in(&work_dir, ScratchKind::PredictOutput)?;

        let invocation = ToolInvocation::new(&self.config.interpreter)
            .arg(self.config.predict_script_path())
            .arg("-i")
            .arg(input.path())
            .arg("-m")
            .arg(handle.path())
            .arg("-o")
            .arg(output.path())
            .arg("--quiet");
        let run = invocation
            .run(self.config.timeout(), self.config.fail_on_stderr)
            .await?;
        log_stdout(&invocation, &run);

        let text = tokio::fs::read_to_string(output.path())
            .await
            .map_err(|e| ModelError::Decoding(format!("cannot read predictor output: {}", e)))?;
        let predictions = self.schema.decode(&text, &matrix)?;

        debug!(
            "Predicted {} rows with model {} in {:?}",
            predictions.len(),
            handle.id(),
            run.elapsed
        );
        Ok(predictions)
    }
}

fn log_stdout(invocation: &ToolInvocation, run: &ToolRun) {
    for line in run.stdout.lines().filter(|l| !l.trim().is_empty()) {
        debug!("[{}] {}", invocation.command_line(), line);
    }
}

async fn write_matrix(
    dir: &Path,
    kind: ScratchKind,
    matrix: &EncodedMatrix,
) -> ModelResult<ScratchFile> {
    let file = ScratchFile::create_in(dir, kind)?;
    tokio::fs::write(file.path(), matrix.to_text()).await?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn dataset() -> Dataset {
        let cols = ["x", "s", "y"].iter().map(|s| s.to_string()).collect();
        Dataset::new(cols, vec!["s".into()], vec!["y".into()])
            .unwrap()
            .with_rows(vec![vec![0.5, 1.0, 0.0]])
            .unwrap()
    }

    fn unreachable_tool() -> KamishimaTool {
        KamishimaTool::new(ToolConfig {
            interpreter: "fairlab-no-such-interpreter".to_string(),
            work_dir: Some(PathBuf::from("/definitely/not/a/dir")),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_negative_eta_rejected_before_any_io() {
        let roles = ColumnRoles::new("s", "y");
        let err = unreachable_tool()
            .train(&dataset(), &roles, FeaturePolicy::default(), -1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_predict_with_vanished_model_is_precondition() {
        let handle = ModelHandle::new(
            PathBuf::from("/definitely/not/a/model"),
            Utc::now(),
            1.0,
            ColumnRoles::new("s", "y"),
            FeaturePolicy::default(),
            1,
        );
        let err = unreachable_tool().predict(&dataset(), &handle).await.unwrap_err();
        assert!(matches!(err, ModelError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_unreadable_model_location_is_io_error() {
        // A path beneath a regular file cannot be stat'ed (ENOTDIR)
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let handle = ModelHandle::new(
            blocker.path().join("model"),
            Utc::now(),
            1.0,
            ColumnRoles::new("s", "y"),
            FeaturePolicy::default(),
            1,
        );
        let err = unreachable_tool().predict(&dataset(), &handle).await.unwrap_err();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
