//! fairlab Core Domain
//!
//! Pure domain types for fairness-aware classifier experiments.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    ColumnRoles, Dataset, DatasetError, FeaturePolicy, ModelHandle, ModelId, Prediction,
    Predictions, ResolvedRoles,
};
pub use values::{ClassScores, Label, Timestamp};
