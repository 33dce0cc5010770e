use async_trait::async_trait;
use fairlab_core::{Dataset, Predictions};

use crate::error::ModelResult;

/// Port for fairness-aware classifiers
///
/// Implementations may wrap an external tool or learn in-process; callers
/// only see `fit` and `predict`. A classifier is either untrained or holds
/// exactly one trained model; fitting again replaces it.
#[async_trait]
pub trait FairClassifier: Send + Sync {
    /// Train on `dataset`, replacing any previously trained model
    async fn fit(&mut self, dataset: &Dataset) -> ModelResult<()>;

    /// Predict labels and class scores for every row of `dataset`, in order
    ///
    /// Fails with `ModelError::Precondition` if the classifier is untrained.
    async fn predict(&self, dataset: &Dataset) -> ModelResult<Predictions>;

    /// Whether a trained model is available
    fn is_trained(&self) -> bool;

    /// Get the classifier's name/identifier for logging
    fn name(&self) -> &str {
        "FairClassifier"
    }
}
