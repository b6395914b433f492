//! Tool registration metadata for `execute_command`.
//!
//! Agent runtimes list tools by name, description and a JSON schema of their
//! input. This module holds those constants and derives the schema from the
//! ordered parameter descriptors.
//!
//! ```
//! use shellward::tools::definition::{tool_definition, PARAMETERS};
//!
//! let def = tool_definition();
//! assert_eq!(def.name, "execute_command");
//! assert_eq!(PARAMETERS.len(), 3);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Registered tool name.
pub const TOOL_NAME: &str = "execute_command";

/// Registered tool description.
pub const TOOL_DESCRIPTION: &str = "Execute a shell command with safety validations";

/// JSON type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    String,
    Integer,
}

impl ParameterType {
    /// JSON schema type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
        }
    }
}

/// One input parameter of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub kind: ParameterType,
    pub description: &'static str,
    pub required: bool,
}

/// The tool's parameters, in declaration order.
pub const PARAMETERS: [ParameterDescriptor; 3] = [
    ParameterDescriptor {
        name: "command",
        kind: ParameterType::String,
        description: "The shell command to execute",
        required: true,
    },
    ParameterDescriptor {
        name: "workingDirectory",
        kind: ParameterType::String,
        description: "Directory to run the command in, relative to the workspace root (defaults to the workspace root)",
        required: false,
    },
    ParameterDescriptor {
        name: "timeout",
        kind: ParameterType::Integer,
        description: "Timeout in milliseconds (defaults to 30000)",
        required: false,
    },
];

/// A tool definition as sent to a model provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// The unique name of the tool.
    pub name: String,

    /// Human-readable description of what the tool does.
    pub description: String,

    /// JSON Schema defining the input parameters.
    pub input_schema: Value,
}

/// Builds the `execute_command` definition from [`PARAMETERS`].
#[must_use]
pub fn tool_definition() -> ToolDefinition {
    let mut properties = Map::new();
    for param in &PARAMETERS {
        properties.insert(
            param.name.to_string(),
            json!({
                "type": param.kind.as_str(),
                "description": param.description,
            }),
        );
    }

    let required: Vec<&str> = PARAMETERS
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name)
        .collect();

    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description: TOOL_DESCRIPTION.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}
