mod dataset;
mod model_handle;
mod prediction;
mod roles;

pub use dataset::{Dataset, DatasetError, FeaturePolicy};
pub use model_handle::{ModelHandle, ModelId};
pub use prediction::{Prediction, Predictions};
pub use roles::{ColumnRoles, ResolvedRoles};
