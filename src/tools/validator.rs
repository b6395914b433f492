//! Request validation.
//!
//! [`validate`] is the only way to obtain a [`ValidatedCommand`], and the
//! executor only accepts a `ValidatedCommand`, so nothing reaches a child
//! process without passing every check. Checks run in a fixed order and the
//! first failure wins:
//!
//! 1. `command` present and non-blank
//! 2. working directory does not traverse out of the workspace
//! 3. working directory lies inside the workspace
//! 4. safety rules (see [`SafetyRule::ORDERED`](super::security::SafetyRule::ORDERED))

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::security::check_command;
use super::workspace::resolve_working_directory;
use crate::error::ShellwardResult;
use crate::types::{ExecutionRequest, ExecutorConfig};

/// A command that passed validation, with its resolved directory and timeout.
///
/// Cannot be constructed outside this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    command: String,
    working_dir: PathBuf,
    timeout: Duration,
}

impl ValidatedCommand {
    /// The command line, exactly as requested.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Absolute directory to run in.
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Effective timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Validates `request` against the workspace and safety rules.
///
/// Pure apart from logging: no filesystem access, no process spawning.
///
/// # Errors
///
/// Returns the first failed check as `MissingParameter`, `PathTraversal`,
/// `WorkspaceViolation` or `SafetyBlocked`.
pub fn validate(request: &ExecutionRequest, config: &ExecutorConfig) -> ShellwardResult<ValidatedCommand> {
    let command = request.command()?;
    let working_dir = resolve_working_directory(
        &config.workspace_root,
        request.working_directory.as_deref(),
    )?;
    check_command(command)?;

    Ok(ValidatedCommand {
        command: command.to_string(),
        working_dir,
        timeout: config.resolve_timeout(request.timeout),
    })
}
