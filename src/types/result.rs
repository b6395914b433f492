//! The `execute_command` output object.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ShellwardError;
use crate::tools::definition::TOOL_NAME;

/// Details about how a call ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    /// Always `"execute_command"`.
    pub tool_name: String,
    /// Wall-clock time of the call in milliseconds.
    pub execution_time: f64,
    /// Exit code, when the process ran to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Captured stderr, when the process ran to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ExecutionMetadata {
    /// Creates metadata for a call that took `elapsed`.
    #[must_use]
    pub fn new(elapsed: Duration) -> Self {
        Self {
            tool_name: TOOL_NAME.to_string(),
            execution_time: elapsed.as_nanos() as f64 / 1_000_000.0,
            exit_code: None,
            stderr: None,
        }
    }

    /// Records the process exit code and stderr.
    #[must_use]
    pub fn with_process(mut self, exit_code: i32, stderr: impl Into<String>) -> Self {
        self.exit_code = Some(exit_code);
        self.stderr = Some(stderr.into());
        self
    }
}

/// Outcome of one `execute_command` call.
///
/// `success == false` always carries a non-empty `error`.
///
/// # Examples
///
/// ```
/// use shellward::error::ShellwardError;
/// use shellward::types::{ExecutionMetadata, ExecutionResult};
/// use std::time::Duration;
///
/// let metadata = ExecutionMetadata::new(Duration::from_millis(3));
/// let result = ExecutionResult::failed(&ShellwardError::timeout(100), metadata);
/// assert!(!result.success);
/// assert!(result.error.unwrap().contains("timed out"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Whether the command ran and exited with status 0.
    pub success: bool,
    /// Captured stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Timing and process details.
    pub metadata: ExecutionMetadata,
}

impl ExecutionResult {
    /// A successful call with its stdout.
    #[must_use]
    pub fn succeeded(output: impl Into<String>, metadata: ExecutionMetadata) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            metadata,
        }
    }

    /// A failed call.
    #[must_use]
    pub fn failed(error: &ShellwardError, metadata: ExecutionMetadata) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_string()),
            metadata,
        }
    }

    /// Attaches stdout captured before a failure. Empty output is dropped.
    #[must_use]
    pub fn with_partial_output(mut self, output: String) -> Self {
        if !output.is_empty() {
            self.output = Some(output);
        }
        self
    }
}
