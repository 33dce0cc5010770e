//! fairlab Prejudice Remover
//!
//! In-processing bias mitigation through Kamishima's prejudice remover
//! regularizer. Training and prediction are delegated to the external
//! `train_pr.py` / `predict_lr.py` scripts; this crate owns the contract
//! around them:
//!
//! - **Encoding**: dataset rows -> whitespace matrix, sensitive attribute and
//!   label as the last two columns
//! - **Invocation**: fixed flag layout, exit status and stderr checked,
//!   optional timeout
//! - **Decoding**: predictor output validated against a named column schema
//! - **Scratch files**: uniquely named per call, removed on every exit path
//!
//! ## Flow
//!
//! ```text
//!   Dataset ──encode──► input.dat ──train_pr.py -e η──► model file ──► ModelHandle
//!
//!   Dataset ──encode──► input.dat ─┐
//!                                  ├─predict_lr.py──► output.dat ──decode──► Predictions
//!            ModelHandle ──────────┘
//! ```

pub mod config;
pub mod encoding;
pub mod process;
pub mod remover;
pub mod schema;
pub mod scratch;
pub mod tool;

// Re-export commonly used types
pub use config::{PrejudiceRemoverConfig, ToolConfig};
pub use encoding::{EncodedMatrix, EncodedRow};
pub use process::{ToolInvocation, ToolRun};
pub use remover::{ModelState, PrejudiceRemover};
pub use schema::{OutputColumn, OutputRow, OutputSchema};
pub use tool::KamishimaTool;
