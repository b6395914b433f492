//! Centralized error types for Shellward.
//!
//! Every way an `execute_command` call can fail is a variant of
//! [`ShellwardError`]. The `Display` output of each variant is part of the
//! public contract: callers match on stable substrings such as
//! `"Directory traversal not allowed"` or `"exit code 1"`, so the wording
//! must not drift.
//!
//! # Example
//!
//! ```
//! use shellward::error::{ShellwardError, ShellwardResult};
//!
//! fn require_command(command: Option<&str>) -> ShellwardResult<&str> {
//!     command
//!         .filter(|c| !c.trim().is_empty())
//!         .ok_or_else(|| ShellwardError::missing_parameter("command"))
//! }
//!
//! let err = require_command(None).unwrap_err();
//! assert_eq!(err.to_string(), "Required parameter 'command' is missing");
//! assert!(!err.is_security_related());
//! ```

use std::fmt;

use crate::tools::security::SafetyRule;

/// Result type alias using `ShellwardError`.
pub type ShellwardResult<T> = Result<T, ShellwardError>;

/// Centralized error type for Shellward.
#[derive(Debug)]
pub enum ShellwardError {
    // ============== Validation Errors ==============
    /// A required request field was absent or blank.
    MissingParameter {
        /// Name of the missing parameter.
        name: &'static str,
    },

    /// The working directory walks upward out of the workspace root.
    PathTraversal {
        /// The directory as requested.
        path: String,
    },

    /// The resolved working directory lies outside the workspace root.
    WorkspaceViolation {
        /// The directory as requested.
        path: String,
    },

    /// The command matched one of the safety rules.
    SafetyBlocked {
        /// The rule that rejected the command.
        rule: SafetyRule,
        /// Human-readable detail, appended to the message.
        reason: String,
    },

    // ============== Execution Errors ==============
    /// The process did not finish before its deadline.
    Timeout {
        /// Timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The process ran and exited with a failing status.
    NonZeroExit {
        /// Exit code (`-1` when terminated by a signal).
        code: i32,
        /// Trimmed stderr, when the process wrote any.
        stderr: Option<String>,
    },

    /// The process could not be started.
    SpawnFailure {
        /// Description of the spawn error.
        message: String,
    },

    /// Reading the output streams or waiting on the process failed.
    OutputCapture {
        /// Description of the I/O error.
        message: String,
    },

    // ============== Config Errors ==============
    /// Configuration could not be loaded.
    Config {
        /// Description of the config error.
        message: String,
    },
}

// ============== Constructor Methods ==============

impl ShellwardError {
    /// Creates a missing parameter error.
    #[must_use]
    pub fn missing_parameter(name: &'static str) -> Self {
        Self::MissingParameter { name }
    }

    /// Creates a directory traversal error.
    #[must_use]
    pub fn path_traversal(path: impl Into<String>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Creates a workspace confinement error.
    #[must_use]
    pub fn workspace_violation(path: impl Into<String>) -> Self {
        Self::WorkspaceViolation { path: path.into() }
    }

    /// Creates a safety rejection.
    #[must_use]
    pub fn safety_blocked(rule: SafetyRule, reason: impl Into<String>) -> Self {
        Self::SafetyBlocked {
            rule,
            reason: reason.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(timeout_ms: u64) -> Self {
        Self::Timeout { timeout_ms }
    }

    /// Creates a non-zero exit error. Blank stderr is dropped.
    #[must_use]
    pub fn non_zero_exit(code: i32, stderr: &str) -> Self {
        let stderr = stderr.trim();
        Self::NonZeroExit {
            code,
            stderr: (!stderr.is_empty()).then(|| stderr.to_string()),
        }
    }

    /// Creates a spawn failure.
    #[must_use]
    pub fn spawn_failure(message: impl Into<String>) -> Self {
        Self::SpawnFailure {
            message: message.into(),
        }
    }

    /// Creates an output capture failure.
    #[must_use]
    pub fn output_capture(message: impl Into<String>) -> Self {
        Self::OutputCapture {
            message: message.into(),
        }
    }

    /// Creates a config error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ============== Category Methods ==============

impl ShellwardError {
    /// Returns `true` if retrying the same request could succeed.
    ///
    /// Only timeouts qualify; validation failures are deterministic.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this error is a security rejection.
    #[must_use]
    pub fn is_security_related(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::WorkspaceViolation { .. } | Self::SafetyBlocked { .. }
        )
    }

    /// Returns the phase that produced this error.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingParameter { .. }
            | Self::PathTraversal { .. }
            | Self::WorkspaceViolation { .. }
            | Self::SafetyBlocked { .. } => "validation",

            Self::Timeout { .. }
            | Self::NonZeroExit { .. }
            | Self::SpawnFailure { .. }
            | Self::OutputCapture { .. } => "execution",

            Self::Config { .. } => "config",
        }
    }

    /// Returns the exit code carried by a `NonZeroExit`.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// ============== Display Implementation ==============

impl fmt::Display for ShellwardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParameter { name } => {
                write!(f, "Required parameter '{}' is missing", name)
            }
            Self::PathTraversal { .. } => write!(f, "Directory traversal not allowed"),
            Self::WorkspaceViolation { .. } => {
                write!(f, "Access denied: Cannot execute commands outside workspace")
            }
            Self::SafetyBlocked { reason, .. } => {
                write!(f, "Command blocked for safety: {}", reason)
            }

            Self::Timeout { timeout_ms } => {
                write!(f, "Command timed out after {}ms", timeout_ms)
            }
            Self::NonZeroExit { code, stderr } => match stderr {
                Some(stderr) => write!(f, "Command failed with exit code {}: {}", code, stderr),
                None => write!(f, "Command failed with exit code {}", code),
            },
            Self::SpawnFailure { message } => {
                write!(f, "Failed to spawn command: {}", message)
            }
            Self::OutputCapture { message } => {
                write!(f, "Failed to collect command output: {}", message)
            }

            Self::Config { message } => write!(f, "config: {}", message),
        }
    }
}

impl std::error::Error for ShellwardError {}

// ============== Unit Tests ==============
