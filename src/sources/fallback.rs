//! Fallback retrieval through an external helper process
//!
//! The helper is expected to print the same GraphQL envelope the API
//! returns on standard output and exit with status 0.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::leetcode::parse_daily_response;
use crate::models::DailyProblem;
use crate::utils::error::FetchError;

/// External helper invocation
#[derive(Debug, Clone)]
pub struct FallbackFetcher {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl FallbackFetcher {
    /// Create a fetcher for `program args...`
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Build from a command vector; `None` when the vector is empty
    pub fn from_command(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec(), timeout))
    }

    /// Program name, for logging
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the helper and parse its output
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` if the helper does not finish in time
    /// - `FetchError::Helper` if it cannot be spawned or exits unsuccessfully
    /// - `FetchError::Decode` if its output is not a usable envelope
    pub async fn fetch(&self) -> Result<DailyProblem, FetchError> {
        tracing::info!(program = %self.program, "Running fallback helper");

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::Helper(format!("failed to spawn {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Helper(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|e| FetchError::Decode(e.to_string()))?;

        parse_daily_response(&stdout).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
