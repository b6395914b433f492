//! Cross-platform shell abstraction layer.
//!
//! Commands are handed to the platform's command interpreter as a single
//! string: `sh -c <command>` on Unix and `cmd.exe /C <command>` on Windows.
//!
//! # Examples
//!
//! ```
//! use shellward::shell::ShellConfig;
//!
//! let config = ShellConfig::default();
//! // On Unix: command = "sh", args = ["-c"]
//! // On Windows: command = "cmd.exe", args = ["/C"]
//! assert!(!config.command.is_empty());
//! ```

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Configuration for platform-specific shell execution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ShellConfig {
    /// The shell executable (e.g., "sh" or "cmd.exe").
    pub command: String,
    /// Arguments to pass before the command string (e.g., ["-c"] or ["/C"]).
    pub args: Vec<String>,
}

#[cfg(unix)]
impl Default for ShellConfig {
    fn default() -> Self {
        Self::new("sh", ["-c"])
    }
}

#[cfg(windows)]
impl Default for ShellConfig {
    fn default() -> Self {
        Self::new("cmd.exe", ["/C"])
    }
}

impl ShellConfig {
    /// Creates a shell configuration for a custom interpreter.
    ///
    /// # Examples
    ///
    /// ```
    /// use shellward::shell::ShellConfig;
    ///
    /// let bash = ShellConfig::new("bash", ["-c"]);
    /// assert_eq!(bash.args, vec!["-c"]);
    /// ```
    pub fn new<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds the child process for `script`, ready to spawn.
    ///
    /// The child runs in `working_dir` with stdin closed and both output
    /// streams piped. It is killed if the handle is dropped before it exits,
    /// and on Unix it leads its own process group so that everything it
    /// starts can be signalled together.
    pub fn build_command(&self, script: &str, working_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(script)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }
}

/// Output from a finished shell command.
///
/// # Examples
///
/// ```
/// use shellward::shell::ShellOutput;
///
/// let output = ShellOutput {
///     exit_code: 0,
///     stdout: "hello\n".to_string(),
///     stderr: String::new(),
/// };
/// assert!(output.success());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when terminated by a signal).
    pub exit_code: i32,
    /// Standard output captured from the process.
    pub stdout: String,
    /// Standard error captured from the process.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` if the command exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
