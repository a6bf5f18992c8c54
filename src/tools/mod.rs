//! Tool registry and dispatch.
//!
//! Every call goes through the same steps: look up the tool, validate the
//! argument bag against its field table, parse it into a typed
//! [`ToolRequest`], then execute the request against the session. Nothing
//! touches the network until parsing has succeeded.

pub mod args;
pub mod documents;
pub mod metadata;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{McpError, Result};
use crate::session::McpSession;

use self::args::{object_schema, validate, FieldSpec};
use self::documents::{EditDocuments, GetDocuments};
use self::metadata::CreateEntity;
use crate::model::EntityKind;

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "get_documents")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Static declaration of a tool: its name, description and argument table.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    /// Tool name
    pub name: &'static str,
    /// Tool description
    pub description: &'static str,
    /// Argument table
    pub fields: &'static [FieldSpec],
}

impl ToolSpec {
    fn def(&self) -> ToolDef {
        ToolDef::new(self.name, self.description, object_schema(self.fields))
    }
}

/// A parsed, validated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    /// `list_tags`
    ListTags,
    /// `list_correspondents`
    ListCorrespondents,
    /// `list_document_types`
    ListDocumentTypes,
    /// `get_documents`
    GetDocuments(GetDocuments),
    /// `edit_documents`
    EditDocuments(EditDocuments),
    /// `create_correspondent`
    CreateCorrespondent(CreateEntity),
    /// `create_document_type`
    CreateDocumentType(CreateEntity),
    /// `create_tag`
    CreateTag(CreateEntity),
}

impl ToolRequest {
    /// Validate an argument bag for the named tool and build the request.
    pub fn parse(name: &str, args: &Map<String, JsonValue>) -> Result<Self> {
        let spec = find_spec(name).ok_or_else(|| McpError::UnknownTool(name.to_string()))?;
        let args = validate(spec.fields, args)?;

        match spec.name {
            metadata::LIST_TAGS => Ok(ToolRequest::ListTags),
            metadata::LIST_CORRESPONDENTS => Ok(ToolRequest::ListCorrespondents),
            metadata::LIST_DOCUMENT_TYPES => Ok(ToolRequest::ListDocumentTypes),
            documents::GET_DOCUMENTS => GetDocuments::parse(&args).map(ToolRequest::GetDocuments),
            documents::EDIT_DOCUMENTS => EditDocuments::parse(&args).map(ToolRequest::EditDocuments),
            metadata::CREATE_CORRESPONDENT => {
                CreateEntity::parse(&args).map(ToolRequest::CreateCorrespondent)
            }
            metadata::CREATE_DOCUMENT_TYPE => {
                CreateEntity::parse(&args).map(ToolRequest::CreateDocumentType)
            }
            metadata::CREATE_TAG => CreateEntity::parse(&args).map(ToolRequest::CreateTag),
            _ => Err(McpError::UnknownTool(name.to_string())),
        }
    }

    /// Run the request.
    pub async fn execute(self, session: &McpSession) -> Result<JsonValue> {
        match self {
            ToolRequest::ListTags => metadata::list(session, EntityKind::Tag).await,
            ToolRequest::ListCorrespondents => metadata::list(session, EntityKind::Correspondent).await,
            ToolRequest::ListDocumentTypes => metadata::list(session, EntityKind::DocumentType).await,
            ToolRequest::GetDocuments(req) => req.execute(session).await,
            ToolRequest::EditDocuments(req) => req.execute(session).await,
            ToolRequest::CreateCorrespondent(req) => {
                req.execute(session, EntityKind::Correspondent).await
            }
            ToolRequest::CreateDocumentType(req) => {
                req.execute(session, EntityKind::DocumentType).await
            }
            ToolRequest::CreateTag(req) => req.execute(session, EntityKind::Tag).await,
        }
    }
}

fn all_specs() -> impl Iterator<Item = &'static ToolSpec> {
    metadata::SPECS.iter().chain(documents::SPECS.iter())
}

fn find_spec(name: &str) -> Option<&'static ToolSpec> {
    all_specs().find(|spec| spec.name == name)
}

/// Content item inside a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContent {
    /// Always "text"
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload
    pub text: String,
}

/// Result envelope of a `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Set only on failure
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Result content
    pub content: Vec<ToolContent>,
}

impl ToolResponse {
    /// Successful result; the payload is pretty-printed JSON.
    pub fn success(payload: &JsonValue) -> Self {
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        Self::text(false, text)
    }

    /// Failed result carrying the error category, message and fields.
    pub fn failure(err: &McpError) -> Self {
        let mut body = serde_json::json!({
            "error": err.kind(),
            "message": err.to_string(),
        });
        let fields = err.fields();
        if !fields.is_empty() {
            body["fields"] = serde_json::json!(fields);
        }
        let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| err.to_string());
        Self::text(true, text)
    }

    fn text(is_error: bool, text: String) -> Self {
        Self {
            is_error,
            content: vec![ToolContent {
                kind: "text".to_string(),
                text,
            }],
        }
    }

    /// Text of the first content item.
    pub fn text_payload(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// Registry of available MCP tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
}

impl ToolRegistry {
    /// Create the registry with every document-archive tool.
    pub fn new() -> Self {
        Self {
            tools: all_specs().map(ToolSpec::def).collect(),
        }
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// Dispatch a tool call to the appropriate handler.
    pub async fn dispatch(
        &self,
        session: &McpSession,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        debug!(tool = name, "dispatch");
        let request = ToolRequest::parse(name, &args)?;
        request.execute(session).await
    }

    /// Dispatch and wrap the outcome in a result envelope.
    ///
    /// Only an unknown tool name is returned as `Err`; every other failure
    /// becomes an error envelope.
    pub async fn call(
        &self,
        session: &McpSession,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<ToolResponse> {
        match self.dispatch(session, name, args).await {
            Ok(payload) => Ok(ToolResponse::success(&payload)),
            Err(e @ McpError::UnknownTool(_)) => Err(e),
            Err(e) => {
                debug!(tool = name, kind = e.kind(), error = %e, "tool failed");
                Ok(ToolResponse::failure(&e))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
