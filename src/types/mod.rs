//! Core type definitions for Shellward.
//!
//! - [`config`] - Executor configuration and the config file
//! - [`request`] - The `execute_command` input object
//! - [`result`] - The `execute_command` output object
//!
//! ```
//! use shellward::types::{ExecutionRequest, ExecutionResult, ExecutorConfig};
//! ```

pub mod config;
pub mod request;
pub mod result;

// Re-export common types for convenience
pub use config::ExecutorConfig;
pub use request::ExecutionRequest;
pub use result::{ExecutionMetadata, ExecutionResult};
