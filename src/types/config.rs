//! Configuration types for Shellward.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then whatever the caller (usually the CLI) overrides.
//!
//! ```toml
//! [executor]
//! workspace_root = "/home/user/project"
//! default_timeout_ms = 30000
//! max_timeout_ms = 600000
//! max_output_bytes = 1048576
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::error::ShellwardError;
use crate::shell::ShellConfig;
use crate::tools::workspace::normalize_path;

/// Timeout applied when a request does not name one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Upper bound on any requested timeout.
pub const DEFAULT_MAX_TIMEOUT_MS: u64 = 600_000;

/// Per-stream cap on captured output.
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KiB

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is larger than the size cap.
    #[error("config file exceeds {limit} byte limit")]
    TooLarge {
        /// The size cap in bytes.
        limit: u64,
    },

    /// The file is not valid TOML for the config schema.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parse but contradict each other.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ShellwardError {
    fn from(err: ConfigError) -> Self {
        ShellwardError::config(err.to_string())
    }
}

// --- TOML deserialization structs (map 1:1 to the file schema) ---

/// Contents of a `config.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// The `[executor]` table.
    #[serde(default)]
    pub executor: ExecutorSection,
}

/// The `[executor]` table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorSection {
    /// Workspace root. Relative paths are resolved against the config file's directory.
    pub workspace_root: Option<PathBuf>,
    /// Default timeout in milliseconds.
    pub default_timeout_ms: Option<u64>,
    /// Maximum timeout in milliseconds.
    pub max_timeout_ms: Option<u64>,
    /// Per-stream output cap in bytes.
    pub max_output_bytes: Option<usize>,
}

impl FromStr for ConfigFile {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl ConfigFile {
    /// Loads a config file. Checks file size before reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is too large, or does not
    /// match the schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = std::fs::metadata(path).map_err(io_err)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                limit: MAX_CONFIG_FILE_SIZE,
            });
        }

        let content = std::fs::read_to_string(path).map_err(io_err)?;
        let mut file: ConfigFile = content.parse()?;

        if let (Some(root), Some(dir)) = (&file.executor.workspace_root, path.parent()) {
            if root.is_relative() {
                file.executor.workspace_root = Some(dir.join(root));
            }
        }

        Ok(file)
    }
}

/// Runtime configuration of the command executor.
///
/// # Examples
///
/// ```
/// use shellward::types::config::ExecutorConfig;
/// use std::time::Duration;
///
/// let config = ExecutorConfig::new("/home/user/project")
///     .with_default_timeout(Duration::from_secs(10));
/// assert_eq!(config.resolve_timeout(None), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Absolute, normalized workspace root. All commands run at or below it.
    pub workspace_root: PathBuf,

    /// Timeout used when a request does not specify one.
    pub default_timeout: Duration,

    /// Requested timeouts are clamped to this value.
    pub max_timeout: Duration,

    /// Maximum bytes kept per output stream.
    ///
    /// Longer stdout or stderr is truncated with a notice.
    pub max_output_size: usize,

    /// Interpreter used to run commands.
    pub shell: ShellConfig,
}

impl ExecutorConfig {
    /// Creates a configuration rooted at `workspace_root` with default limits.
    ///
    /// A relative root is made absolute against the current directory.
    #[must_use]
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: absolute_root(workspace_root.into()),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_timeout: Duration::from_millis(DEFAULT_MAX_TIMEOUT_MS),
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
            shell: ShellConfig::default(),
        }
    }

    /// Sets the default timeout.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the maximum timeout.
    #[must_use]
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    /// Sets the per-stream output cap.
    #[must_use]
    pub fn with_max_output_size(mut self, bytes: usize) -> Self {
        self.max_output_size = bytes;
        self
    }

    /// Sets the interpreter.
    #[must_use]
    pub fn with_shell(mut self, shell: ShellConfig) -> Self {
        self.shell = shell;
        self
    }

    /// Applies the values present in a config file on top of this one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a limit is zero or the default
    /// timeout exceeds the maximum.
    pub fn apply_file(mut self, file: &ConfigFile) -> Result<Self, ConfigError> {
        let section = &file.executor;

        if let Some(root) = &section.workspace_root {
            self.workspace_root = absolute_root(root.clone());
        }
        if let Some(ms) = section.default_timeout_ms {
            self.default_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = section.max_timeout_ms {
            self.max_timeout = Duration::from_millis(ms);
        }
        if let Some(bytes) = section.max_output_bytes {
            self.max_output_size = bytes;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks that the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout.is_zero() || self.max_timeout.is_zero() {
            return Err(ConfigError::Invalid("timeouts must be greater than zero".into()));
        }
        if self.default_timeout > self.max_timeout {
            return Err(ConfigError::Invalid(format!(
                "default timeout {}ms exceeds maximum {}ms",
                self.default_timeout.as_millis(),
                self.max_timeout.as_millis()
            )));
        }
        if self.max_output_size == 0 {
            return Err(ConfigError::Invalid("max_output_bytes must be greater than zero".into()));
        }
        Ok(())
    }

    /// Returns the effective timeout for a request.
    ///
    /// `None` and `Some(0)` mean the default; anything above the maximum is
    /// clamped. A zero default or maximum set through the builders falls back
    /// to the built-in value, so the result is never zero.
    #[must_use]
    pub fn resolve_timeout(&self, requested_ms: Option<u64>) -> Duration {
        let max = nonzero_or(self.max_timeout, DEFAULT_MAX_TIMEOUT_MS);
        let default = nonzero_or(self.default_timeout, DEFAULT_TIMEOUT_MS);
        match requested_ms {
            Some(ms) if ms > 0 => Duration::from_millis(ms).min(max),
            _ => default.min(max),
        }
    }
}

impl Default for ExecutorConfig {
    /// Rooted at the current directory.
    fn default() -> Self {
        Self::new(".")
    }
}

fn nonzero_or(value: Duration, fallback_ms: u64) -> Duration {
    if value.is_zero() {
        Duration::from_millis(fallback_ms)
    } else {
        value
    }
}

fn absolute_root(root: PathBuf) -> PathBuf {
    let absolute = if root.is_absolute() {
        root
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(root),
            Err(_) => root,
        }
    };
    normalize_path(&absolute)
}
