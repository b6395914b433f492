//! The `execute_command` tool.
//!
//! [`ExecuteCommandTool`] is the entry point agent runtimes call. It validates
//! the request, runs the command, and folds every outcome into an
//! [`ExecutionResult`]; callers never see an `Err` or a panic for expected
//! failures.

pub mod definition;
pub mod executor;
pub mod security;
pub mod validator;
pub mod workspace;

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ShellwardError;
use crate::types::{ExecutionMetadata, ExecutionRequest, ExecutionResult, ExecutorConfig};

pub use definition::{tool_definition, ParameterDescriptor, ToolDefinition, PARAMETERS};
pub use security::SafetyRule;
pub use validator::{validate, ValidatedCommand};

/// Executes shell commands inside a workspace, after safety validation.
///
/// Cheap to clone; clones share one configuration. Calls are independent and
/// may run concurrently.
///
/// # Examples
///
/// ```no_run
/// use shellward::tools::ExecuteCommandTool;
/// use shellward::types::ExecutorConfig;
/// use serde_json::json;
///
/// # async fn demo() {
/// let tool = ExecuteCommandTool::new(ExecutorConfig::new("/home/user/project"));
/// let result = tool.execute(&json!({ "command": "ls", "workingDirectory": "src" })).await;
/// if result.success {
///     println!("{}", result.output.unwrap_or_default());
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExecuteCommandTool {
    config: Arc<ExecutorConfig>,
}

impl ExecuteCommandTool {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        definition::TOOL_NAME
    }

    pub fn description(&self) -> &'static str {
        definition::TOOL_DESCRIPTION
    }

    pub fn parameters(&self) -> &'static [ParameterDescriptor] {
        &PARAMETERS
    }

    pub fn definition(&self) -> ToolDefinition {
        tool_definition()
    }

    /// Runs the command described by a raw JSON input object.
    pub async fn execute(&self, input: &Value) -> ExecutionResult {
        self.execute_request(ExecutionRequest::from_input(input)).await
    }

    /// Runs the command described by `request`.
    pub async fn execute_request(&self, request: ExecutionRequest) -> ExecutionResult {
        let started = Instant::now();

        let validated = match validate(&request, &self.config) {
            Ok(validated) => validated,
            Err(e) => return self.finish_failed(&e, started),
        };

        debug!(
            command = %validated.command(),
            working_dir = %validated.working_dir().display(),
            timeout_ms = validated.timeout().as_millis() as u64,
            "Executing command"
        );

        match executor::run(&validated, &self.config).await {
            Ok(output) if output.success() => {
                let metadata = ExecutionMetadata::new(started.elapsed())
                    .with_process(output.exit_code, output.stderr);
                ExecutionResult::succeeded(output.stdout, metadata)
            }
            Ok(output) => {
                let err = ShellwardError::non_zero_exit(output.exit_code, &output.stderr);
                debug!(exit_code = output.exit_code, "Command exited with failure");
                let metadata = ExecutionMetadata::new(started.elapsed())
                    .with_process(output.exit_code, output.stderr);
                ExecutionResult::failed(&err, metadata).with_partial_output(output.stdout)
            }
            Err(e) => self.finish_failed(&e, started),
        }
    }

    fn finish_failed(&self, err: &ShellwardError, started: Instant) -> ExecutionResult {
        debug!(stage = err.stage(), error = %err, "Command not completed");
        ExecutionResult::failed(err, ExecutionMetadata::new(started.elapsed()))
    }
}

impl Default for ExecuteCommandTool {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}
