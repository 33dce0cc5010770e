//! fairlab Ports
//!
//! Port definitions (traits) for fairlab.
//! These define the boundaries between experiment logic and the
//! infrastructure that actually trains models (external tools, in-process
//! learners, clocks).

mod classifier;
mod clock;
mod error;

pub use classifier::FairClassifier;
pub use clock::Clock;
pub use error::{ModelError, ModelResult, ToolFailure, ToolReport};
