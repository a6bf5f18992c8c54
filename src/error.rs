//! Error types for the MCP server.

use thiserror::Error;

use crate::model::EntityKind;

/// Result type alias for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// Errors that can occur while serving tool calls.
#[derive(Debug, Error)]
pub enum McpError {
    /// Missing or malformed startup configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tool name not in the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Required argument not supplied.
    #[error("missing required argument '{0}'")]
    MissingArg(String),

    /// Argument present but of the wrong type or shape.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArg {
        /// Argument name
        name: String,
        /// Violated rule
        reason: String,
    },

    /// A rule spanning several arguments was violated.
    #[error("invalid arguments ({}): {rule}", .fields.join(", "))]
    Constraint {
        /// Arguments involved in the rule
        fields: Vec<String>,
        /// Violated rule
        rule: String,
    },

    /// A name given for a write operation is not known to the metadata cache.
    #[error("{kind} not found: '{name}'")]
    NotFound {
        /// Entity kind that was searched
        kind: EntityKind,
        /// Name as supplied by the caller
        name: String,
    },

    /// None of the names in a list argument could be resolved.
    #[error("none of the {kind} names in '{field}' could be resolved: {}", .names.join(", "))]
    Unresolved {
        /// Entity kind that was searched
        kind: EntityKind,
        /// Argument holding the names
        field: String,
        /// Names as supplied by the caller
        names: Vec<String>,
    },

    /// Transport-level failure talking to the document service.
    #[error("request to document service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The document service answered with a non-success status.
    #[error("document service returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The document service answered with a body we could not interpret.
    #[error("unexpected response from document service: {0}")]
    Decode(String),

    /// JSON (de)serialization error on the protocol channel.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error on the protocol channel.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Stable machine-readable category for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::Config(_) => "config_error",
            McpError::UnknownTool(_) => "unknown_tool",
            McpError::MissingArg(_) | McpError::InvalidArg { .. } | McpError::Constraint { .. } => {
                "validation_error"
            }
            McpError::NotFound { .. } | McpError::Unresolved { .. } => "not_found",
            McpError::Http(_) | McpError::Api { .. } | McpError::Decode(_) => "remote_error",
            McpError::Json(_) | McpError::Io(_) | McpError::Internal(_) => "internal",
        }
    }

    /// Argument names implicated in a validation or resolution error.
    pub fn fields(&self) -> Vec<String> {
        match self {
            McpError::MissingArg(name) | McpError::InvalidArg { name, .. } => vec![name.clone()],
            McpError::Constraint { fields, .. } => fields.clone(),
            McpError::NotFound { kind, .. } => vec![kind.field_name().to_string()],
            McpError::Unresolved { field, .. } => vec![field.clone()],
            _ => Vec::new(),
        }
    }

    /// Whether the error was raised locally before any network I/O.
    pub fn is_local(&self) -> bool {
        matches!(self.kind(), "validation_error" | "not_found" | "unknown_tool")
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        McpError::InvalidArg {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn constraint(fields: &[&str], rule: impl Into<String>) -> Self {
        McpError::Constraint {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            rule: rule.into(),
        }
    }
}
