//! # paperless-mcp
//!
//! MCP (Model Context Protocol) server for Paperless-NGX.
//!
//! This crate exposes a Paperless-NGX document archive as tools for AI agents.
//! It implements the MCP protocol over stdin/stdout using JSON-RPC 2.0 and
//! talks to Paperless through its REST API.
//!
//! ## 8 Tools
//!
//! `list_tags`, `list_correspondents`, `list_document_types`, `get_documents`,
//! `edit_documents`, `create_correspondent`, `create_document_type`, `create_tag`
//!
//! Agents refer to tags, correspondents and document types by name. A
//! [`MetadataCache`] loaded at startup turns those names into the IDs the API
//! expects, and is refreshed whenever a tool creates a new entity.
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "paperless": {
//!       "command": "/path/to/paperless-mcp",
//!       "env": {
//!         "PAPERLESS_URL": "http://paperless.local:8000",
//!         "PAPERLESS_TOKEN": "..."
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use paperless_mcp::{McpServer, McpSession, MetadataCache, PaperlessClient, PaperlessConfig};
//!
//! # async fn run() -> paperless_mcp::Result<()> {
//! let config = PaperlessConfig::new(Some("http://paperless.local:8000"), Some("token"), 30)?;
//! let client = Arc::new(PaperlessClient::new(&config)?);
//! let session = McpSession::new(client, Arc::new(MetadataCache::new()));
//! session.initialize().await?;
//!
//! let server = McpServer::new(session);
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cache;
mod client;
mod config;
mod error;
mod format;
mod model;
mod server;
mod session;
pub mod tools;

pub use cache::MetadataCache;
pub use client::{PaperlessApi, PaperlessClient};
pub use config::{PaperlessConfig, DEFAULT_TIMEOUT_SECS};
pub use error::{McpError, Result};
pub use model::{
    BulkEditMethod, BulkEditRequest, Document, DocumentQuery, EntityKind, MetadataEntity,
    NameFilter, NewEntity, Page,
};
pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, PROTOCOL_VERSION};
pub use session::McpSession;
pub use tools::{ToolDef, ToolRegistry, ToolRequest, ToolResponse};
