//! Shellward - guarded shell command execution for coding agents.
//!
//! Runs one shell command at a time inside a workspace directory, after
//! rejecting destructive commands and working directories that escape the
//! workspace.

pub mod error;
pub mod shell;
pub mod tools;
pub mod types;
pub mod util;

// Re-export core types for convenient access
pub use error::{ShellwardError, ShellwardResult};
pub use tools::ExecuteCommandTool;
pub use types::{ExecutionRequest, ExecutionResult, ExecutorConfig};
