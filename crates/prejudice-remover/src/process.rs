//! External tool invocation
//!
//! Runs one command to completion with stdin closed and stdout/stderr
//! captured. Launch failures, non-zero exits and (optionally) stderr noise
//! become [`ToolFailure`]s; exceeding the timeout kills the child.

use fairlab_ports::{ModelError, ModelResult, ToolFailure, ToolReport};
use log::{debug, warn};
use std::ffi::{OsStr, OsString};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;

/// A command line for one of the external scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: String,
    args: Vec<OsString>,
}

/// Output of a successful run
#[derive(Debug, Clone)]
pub struct ToolRun {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Human-readable command line, for logs and error reports
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion, bounded by `timeout` when given
    pub async fn run(
        &self,
        timeout: Option<Duration>,
        fail_on_stderr: bool,
    ) -> ModelResult<ToolRun> {
        let command_line = self.command_line();
        debug!("Running `{}`", command_line);

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolFailure::Launch {
                program: self.program.clone(),
                source,
            })?;

        let started = Instant::now();
        let output = match timeout {
            // Dropping the wait future drops the child, which kills it
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    warn!("`{}` exceeded {:?}, killed", command_line, limit);
                    return Err(ModelError::Timeout { limit });
                }
            },
            None => child.wait_with_output().await?,
        };
        let elapsed = started.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let report = || ToolReport {
            command: command_line.clone(),
            exit_code: output.status.code(),
            stderr: stderr.clone(),
            elapsed,
        };

        if !output.status.success() {
            warn!("`{}` failed: {:?}", command_line, output.status);
            return Err(ToolFailure::NonZeroExit(report()).into());
        }
        if fail_on_stderr && !stderr.trim().is_empty() {
            return Err(ToolFailure::UnexpectedStderr(report()).into());
        }

        debug!("`{}` finished in {:?}", command_line, elapsed);
        Ok(ToolRun {
            stdout,
            stderr,
            elapsed,
        })
    }
}
