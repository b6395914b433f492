//! Tests for Shellward error types.
//!
//! The rendered messages are what callers see in `ExecutionResult.error`,
//! so they are pinned exactly.

use shellward::error::{ShellwardError, ShellwardResult};
use shellward::tools::SafetyRule;

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn test_missing_parameter() {
        let err = ShellwardError::missing_parameter("command");
        assert_eq!(err.to_string(), "Required parameter 'command' is missing");
    }

    #[test]
    fn test_directory_errors() {
        assert_eq!(
            ShellwardError::path_traversal("../..").to_string(),
            "Directory traversal not allowed"
        );
        assert_eq!(
            ShellwardError::workspace_violation("/tmp").to_string(),
            "Access denied: Cannot execute commands outside workspace"
        );
    }

    #[test]
    fn test_safety_blocked() {
        let err = ShellwardError::safety_blocked(SafetyRule::PipeToShell, "Pipe to shell execution is not allowed");
        assert_eq!(
            err.to_string(),
            "Command blocked for safety: Pipe to shell execution is not allowed"
        );
    }

    #[test]
    fn test_timeout() {
        assert_eq!(
            ShellwardError::timeout(100).to_string(),
            "Command timed out after 100ms"
        );
    }

    #[test]
    fn test_non_zero_exit_with_and_without_stderr() {
        assert_eq!(
            ShellwardError::non_zero_exit(1, "").to_string(),
            "Command failed with exit code 1"
        );
        assert_eq!(
            ShellwardError::non_zero_exit(1, "   \n").to_string(),
            "Command failed with exit code 1"
        );
        assert_eq!(
            ShellwardError::non_zero_exit(2, "no such file\n").to_string(),
            "Command failed with exit code 2: no such file"
        );
    }

    #[test]
    fn test_execution_failures() {
        assert_eq!(
            ShellwardError::spawn_failure("No such file or directory").to_string(),
            "Failed to spawn command: No such file or directory"
        );
        assert_eq!(
            ShellwardError::output_capture("broken pipe").to_string(),
            "Failed to collect command output: broken pipe"
        );
    }
}

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn test_security_related() {
        assert!(ShellwardError::path_traversal("..").is_security_related());
        assert!(ShellwardError::workspace_violation("/").is_security_related());
        assert!(ShellwardError::safety_blocked(SafetyRule::UnsafeChain, "x").is_security_related());
        assert!(!ShellwardError::timeout(1).is_security_related());
        assert!(!ShellwardError::missing_parameter("command").is_security_related());
    }

    #[test]
    fn test_only_timeouts_retryable() {
        assert!(ShellwardError::timeout(1).is_retryable());
        assert!(!ShellwardError::non_zero_exit(1, "").is_retryable());
        assert!(!ShellwardError::spawn_failure("x").is_retryable());
    }

    #[test]
    fn test_stage() {
        assert_eq!(ShellwardError::missing_parameter("command").stage(), "validation");
        assert_eq!(ShellwardError::timeout(1).stage(), "execution");
        assert_eq!(ShellwardError::config("bad").stage(), "config");
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(ShellwardError::non_zero_exit(7, "").exit_code(), Some(7));
        assert_eq!(ShellwardError::timeout(1).exit_code(), None);
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> ShellwardResult<()> {
            Err(ShellwardError::timeout(5))
        }
        fn outer() -> ShellwardResult<u8> {
            inner()?;
            Ok(1)
        }
        assert!(outer().unwrap_err().is_retryable());
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ShellwardError::config("x"));
        assert_eq!(err.to_string(), "config: x");
    }
}
