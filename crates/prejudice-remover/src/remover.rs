//! Prejudice Remover classifier
//!
//! Stateful wrapper around [`KamishimaTool`]: resolves which columns play
//! the sensitive/label roles, owns the trained model handle and enforces
//! the untrained -> trained lifecycle.

use crate::config::PrejudiceRemoverConfig;
use crate::tool::KamishimaTool;
use async_trait::async_trait;
use fairlab_core::{ColumnRoles, Dataset, ModelHandle, Predictions};
use fairlab_ports::{Clock, FairClassifier, ModelError, ModelResult};
use log::{info, warn};
use std::sync::Arc;

/// Lifecycle of a prejudice remover
#[derive(Debug, Default)]
pub enum ModelState {
    #[default]
    Untrained,
    Trained(ModelHandle),
}

impl ModelState {
    pub fn handle(&self) -> Option<&ModelHandle> {
        match self {
            ModelState::Untrained => None,
            ModelState::Trained(handle) => Some(handle),
        }
    }
}

/// In-processing fairness classifier with a discrimination-aware regularizer
///
/// See T. Kamishima, S. Akaho, H. Asoh and J. Sakuma, "Fairness-Aware
/// Classifier with Prejudice Remover Regularizer", ECML PKDD 2012.
pub struct PrejudiceRemover {
    config: PrejudiceRemoverConfig,
    tool: KamishimaTool,
    state: ModelState,
}

impl PrejudiceRemover {
    pub fn new(config: PrejudiceRemoverConfig) -> ModelResult<Self> {
        config.validate()?;
        let tool = KamishimaTool::new(config.tool.clone());
        Ok(Self::from_parts(config, tool))
    }

    /// Create with a custom clock for model timestamps
    pub fn with_clock(
        config: PrejudiceRemoverConfig,
        clock: Arc<dyn Clock>,
    ) -> ModelResult<Self> {
        config.validate()?;
        let tool = KamishimaTool::with_clock(config.tool.clone(), clock);
        Ok(Self::from_parts(config, tool))
    }

    fn from_parts(config: PrejudiceRemoverConfig, tool: KamishimaTool) -> Self {
        Self {
            config,
            tool,
            state: ModelState::Untrained,
        }
    }

    pub fn eta(&self) -> f64 {
        self.config.eta
    }

    pub fn config(&self) -> &PrejudiceRemoverConfig {
        &self.config
    }

    pub fn state(&self) -> &ModelState {
        &self.state
    }

    pub fn handle(&self) -> Option<&ModelHandle> {
        self.state.handle()
    }

    /// Train on `dataset`
    ///
    /// On success the new handle replaces any previous one and the previous
    /// model file is deleted. On failure the current state is left as is.
    pub async fn train(&mut self, dataset: &Dataset) -> ModelResult<&ModelHandle> {
        let roles = self.resolve_roles(dataset)?;
        let handle = self
            .tool
            .train(dataset, &roles, self.config.feature_policy, self.config.eta)
            .await?;

        if let ModelState::Trained(previous) =
            std::mem::replace(&mut self.state, ModelState::Trained(handle))
        {
            discard_model(previous).await;
        }

        self.handle()
            .ok_or_else(|| ModelError::Precondition("model handle missing after training".into()))
    }

    /// Predict labels and scores for every row of `dataset`
    pub async fn predict(&self, dataset: &Dataset) -> ModelResult<Predictions> {
        let handle = self.require_handle()?;
        self.tool.predict(dataset, handle).await
    }

    /// Predict and return a copy of `dataset` with its label column replaced
    pub async fn predict_dataset(
        &self,
        dataset: &Dataset,
    ) -> ModelResult<(Dataset, Predictions)> {
        let handle = self.require_handle()?;
        let predictions = self.tool.predict(dataset, handle).await?;
        let relabeled = dataset.with_labels(&handle.roles().label, &predictions.labels())?;
        Ok((relabeled, predictions))
    }

    /// Delete the trained model and return to the untrained state
    pub async fn reset(&mut self) -> ModelResult<()> {
        if let ModelState::Trained(handle) = std::mem::take(&mut self.state) {
            match tokio::fs::remove_file(handle.path()).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            info!("Removed model {} ({})", handle.id(), handle.path().display());
        }
        Ok(())
    }

    fn require_handle(&self) -> ModelResult<&ModelHandle> {
        self.state.handle().ok_or_else(|| {
            ModelError::Precondition("predict called before a successful train".to_string())
        })
    }

    fn resolve_roles(&self, dataset: &Dataset) -> ModelResult<ColumnRoles> {
        let resolved = ColumnRoles::resolve(
            dataset,
            self.config.sensitive_attr.as_deref(),
            self.config.class_attr.as_deref(),
        )?;
        if resolved.defaulted_sensitive {
            warn!(
                "No sensitive attribute configured, defaulting to first protected attribute '{}' of {:?}",
                resolved.roles.sensitive,
                dataset.protected_attribute_names()
            );
        }
        if resolved.defaulted_label {
            warn!(
                "No class attribute configured, defaulting to first label '{}'",
                resolved.roles.label
            );
        }
        Ok(resolved.roles)
    }
}

async fn discard_model(handle: ModelHandle) {
    match tokio::fs::remove_file(handle.path()).await {
        Ok(()) => info!(
            "Replaced model {}, removed {}",
            handle.id(),
            handle.path().display()
        ),
        Err(e) => warn!(
            "Could not remove replaced model {}: {}",
            handle.path().display(),
            e
        ),
    }
}

#[async_trait]
impl FairClassifier for PrejudiceRemover {
    async fn fit(&mut self, dataset: &Dataset) -> ModelResult<()> {
        self.train(dataset).await.map(|_| ())
    }

    async fn predict(&self, dataset: &Dataset) -> ModelResult<Predictions> {
        PrejudiceRemover::predict(self, dataset).await
    }

    fn is_trained(&self) -> bool {
        self.handle().is_some()
    }

    fn name(&self) -> &str {
        "PrejudiceRemover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use std::path::PathBuf;

    fn dataset() -> Dataset {
        let cols = ["x", "s", "y"].iter().map(|s| s.to_string()).collect();
        Dataset::new(cols, vec!["s".into()], vec!["y".into()])
            .unwrap()
            .with_rows(vec![vec![0.5, 1.0, 0.0], vec![1.5, 0.0, 1.0]])
            .unwrap()
    }

    fn remover_without_tool() -> PrejudiceRemover {
        // Neither the interpreter nor the work dir exist; any I/O would fail
        let config = PrejudiceRemoverConfig {
            tool: ToolConfig {
                interpreter: "fairlab-no-such-interpreter".to_string(),
                work_dir: Some(PathBuf::from("/definitely/not/a/dir")),
                ..Default::default()
            },
            ..Default::default()
        };
        PrejudiceRemover::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_predict_before_train_is_precondition_error() {
        let remover = remover_without_tool();
        assert!(!remover.is_trained());

        let err = remover.predict(&dataset()).await.unwrap_err();
        assert!(matches!(err, ModelError::Precondition(_)));

        let err = remover.predict_dataset(&dataset()).await.unwrap_err();
        assert!(matches!(err, ModelError::Precondition(_)));
    }

    #[tokio::test]
    async fn test_failed_train_leaves_state_untrained() {
        let mut remover = remover_without_tool();
        assert!(remover.train(&dataset()).await.is_err());
        assert!(matches!(remover.state(), ModelState::Untrained));
    }

    #[tokio::test]
    async fn test_reset_when_untrained_is_noop() {
        let mut remover = remover_without_tool();
        remover.reset().await.unwrap();
        assert!(remover.handle().is_none());
    }

    #[test]
    fn test_invalid_eta_rejected_at_construction() {
        let err = PrejudiceRemover::new(PrejudiceRemoverConfig::with_eta(-2.0)).err();
        assert!(matches!(err, Some(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_sensitive_attr_is_encoding_error() {
        let remover = PrejudiceRemover::new(PrejudiceRemoverConfig {
            sensitive_attr: Some("race".to_string()),
            ..Default::default()
        })
        .unwrap();
        let err = remover.resolve_roles(&dataset()).unwrap_err();
        assert!(matches!(err, ModelError::Encoding(msg) if msg.contains("race")));
    }

    #[test]
    fn test_roles_default_to_first_declared() {
        let remover = PrejudiceRemover::new(PrejudiceRemoverConfig::default()).unwrap();
        let roles = remover.resolve_roles(&dataset()).unwrap();
        assert_eq!(roles, ColumnRoles::new("s", "y"));
    }
}
