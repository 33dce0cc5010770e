use fairlab_core::DatasetError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// What an external tool run looked like when it went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    /// Command line that was run, for diagnostics
    pub command: String,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
    /// Wall time between spawn and exit
    pub elapsed: Duration,
}

impl fmt::Display for ToolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "`{}` exited with code {}", self.command, code)?,
            None => write!(f, "`{}` terminated by signal", self.command)?,
        }
        write!(f, " after {:.3}s", self.elapsed.as_secs_f64())?;
        if let Some(line) = self.stderr.lines().rev().find(|l| !l.trim().is_empty()) {
            write!(f, ": {}", line.trim())?;
        }
        Ok(())
    }
}

/// Failures of the external process itself
#[derive(Error, Debug)]
pub enum ToolFailure {
    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    NonZeroExit(ToolReport),

    #[error("Unexpected stderr output: {0}")]
    UnexpectedStderr(ToolReport),
}

/// Errors surfaced by classifier operations
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("External tool failure: {0}")]
    ExternalTool(#[from] ToolFailure),

    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("External tool timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;

impl From<DatasetError> for ModelError {
    fn from(err: DatasetError) -> Self {
        ModelError::Encoding(err.to_string())
    }
}
