//! Runner errors

use fairlab_ports::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Duplicate model name or alias: {0}")]
    DuplicateModel(String),

    #[error("Invalid model selector: {0:?}")]
    InvalidSelector(String),

    #[error("Roster has no models")]
    EmptyRoster,

    #[error("Model '{name}' failed: {source}")]
    Model {
        name: String,
        #[source]
        source: ModelError,
    },
}

pub type Result<T> = std::result::Result<T, RunnerError>;
