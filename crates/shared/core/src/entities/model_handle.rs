use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::dataset::FeaturePolicy;
use super::roles::ColumnRoles;
use crate::values::Timestamp;

/// Unique identifier for a trained model
pub type ModelId = Uuid;

/// Handle to a model persisted by an external trainer
///
/// Owns the on-disk location of the model together with the parameters it
/// was trained with. Deliberately not `Clone`: a handle belongs to the
/// classifier that produced it.
#[derive(Debug, PartialEq, Serialize)]
pub struct ModelHandle {
    id: ModelId,
    path: PathBuf,
    trained_at: Timestamp,
    eta: f64,
    roles: ColumnRoles,
    /// How feature columns were selected from the training dataset
    feature_policy: FeaturePolicy,
    /// Number of non-sensitive feature columns in the training matrix
    feature_count: usize,
}

impl ModelHandle {
    pub fn new(
        path: PathBuf,
        trained_at: Timestamp,
        eta: f64,
        roles: ColumnRoles,
        feature_policy: FeaturePolicy,
        feature_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            trained_at,
            eta,
            roles,
            feature_policy,
            feature_count,
        }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn trained_at(&self) -> Timestamp {
        self.trained_at
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn feature_policy(&self) -> FeaturePolicy {
        self.feature_policy
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }
}
