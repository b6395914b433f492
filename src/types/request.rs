//! The `execute_command` input object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ShellwardError, ShellwardResult};

/// A request to run one command.
///
/// Only `command` is required. Field names follow the camelCase JSON input
/// (`workingDirectory`, `timeout` in milliseconds).
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use shellward::types::ExecutionRequest;
///
/// let request = ExecutionRequest::from_input(&json!({
///     "command": "cargo test",
///     "workingDirectory": "crates/core",
///     "timeout": 60000
/// }));
/// assert_eq!(request.command().unwrap(), "cargo test");
/// assert_eq!(request.timeout, Some(60000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// The command line to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Directory to run in, relative to the workspace root or absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
    /// Timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl ExecutionRequest {
    /// Creates a request for `command` with default directory and timeout.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Self::default()
        }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    /// Extracts a request from a plain JSON input object.
    ///
    /// Fields of the wrong type are treated as absent, so a malformed
    /// `command` surfaces as a missing parameter rather than a parse error.
    #[must_use]
    pub fn from_input(input: &Value) -> Self {
        Self {
            command: input
                .get("command")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            working_directory: input
                .get("workingDirectory")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            timeout: input.get("timeout").and_then(|v| v.as_u64()),
        }
    }

    /// Returns the command, or an error if it is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns `ShellwardError::MissingParameter` for `command`.
    pub fn command(&self) -> ShellwardResult<&str> {
        self.command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ShellwardError::missing_parameter("command"))
    }
}
