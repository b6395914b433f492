//! Unit tests for the cross-platform shell abstraction.

use shellward::shell::{ShellConfig, ShellOutput};
use std::path::Path;

// ============================================================================
// ShellConfig Tests
// ============================================================================

#[test]
#[cfg(unix)]
fn test_shell_config_returns_sh_on_unix() {
    let config = ShellConfig::default();

    assert_eq!(config.command, "sh");
    assert_eq!(config.args, vec!["-c"]);
}

#[test]
#[cfg(windows)]
fn test_shell_config_returns_cmd_on_windows() {
    let config = ShellConfig::default();

    assert_eq!(config.command, "cmd.exe");
    assert_eq!(config.args, vec!["/C"]);
}

#[test]
fn test_custom_shell() {
    let config = ShellConfig::new("bash", ["-e", "-c"]);
    let cmd = config.build_command("echo hi", Path::new("."));

    let args: Vec<_> = cmd
        .as_std()
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, ["-e", "-c", "echo hi"]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_built_command_runs_in_working_dir() {
    let dir = tempfile::tempdir().unwrap();
    let output = ShellConfig::default()
        .build_command("pwd", dir.path())
        .output()
        .await
        .unwrap();

    let printed = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        Path::new(printed.trim()).canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_built_command_has_no_stdin() {
    let dir = tempfile::tempdir().unwrap();
    // `cat` would block forever on an inherited terminal.
    let output = ShellConfig::default()
        .build_command("cat", dir.path())
        .output()
        .await
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

// ============================================================================
// ShellOutput Tests
// ============================================================================

#[test]
fn test_shell_output_success() {
    let output = ShellOutput {
        exit_code: 0,
        stdout: "ok".to_string(),
        stderr: String::new(),
    };
    assert!(output.success());
}

#[test]
fn test_shell_output_signal_is_failure() {
    let output = ShellOutput {
        exit_code: -1,
        stdout: String::new(),
        stderr: String::new(),
    };
    assert!(!output.success());
}
