//! fairlab Runner - Multi-Model Fairness Experiments
//!
//! Orchestrates several fairness-aware classifiers against one dataset:
//!
//! - **Roster**: named models with operator-facing aliases
//! - **Fitting**: every model is trained in turn on the same dataset
//! - **Queries**: a selector (`0`, `b`, `Beaver`, ...) routes a dataset to
//!   one model and returns its predictions
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────┐
//!                  │   Dataset    │
//!                  └──────┬───────┘
//!                         │ fit_all / query
//!                         ▼
//! ┌──────────────────────────────────────────────┐
//! │                 MODEL ROSTER                 │
//! │                                              │
//! │  ┌────────────────┐   ┌────────────────┐     │
//! │  │   Prejudice    │   │     Other      │ ... │
//! │  │    Remover     │   │ FairClassifier │     │
//! │  └───────┬────────┘   └────────────────┘     │
//! └──────────┼───────────────────────────────────┘
//!            │ external scripts
//!            ▼
//!    train_pr.py / predict_lr.py
//! ```

pub mod error;
pub mod roster;
pub mod selector;

// Re-export main types
pub use error::{Result, RunnerError};
pub use roster::{FitReport, ModelRoster, QueryOutcome, RosterEntry};
pub use selector::ModelSelector;
