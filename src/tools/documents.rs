//! Document tools.
//!
//! Tools: get_documents, edit_documents
//!
//! The two tools resolve names differently. `get_documents` only reads, so a
//! name the cache does not know is handed to the server's substring filter.
//! `edit_documents` mutates, so a single correspondent or document type must
//! resolve locally or the call fails before anything is sent. Tag lists are
//! the exception: unknown tag names are dropped.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::{McpError, Result};
use crate::format;
use crate::model::{BulkEditMethod, BulkEditRequest, DocumentQuery, EntityKind};
use crate::session::McpSession;
use crate::tools::args::{Args, FieldSpec, FieldType};
use crate::tools::ToolSpec;

pub(crate) const GET_DOCUMENTS: &str = "get_documents";
pub(crate) const EDIT_DOCUMENTS: &str = "edit_documents";

/// Page size when `limit` is omitted.
pub const DEFAULT_LIMIT: u32 = 10;

/// Arguments of which `get_documents` needs at least one.
const DOCUMENT_FILTERS: &[&str] = &[
    "id",
    "content",
    "title",
    "tag",
    "correspondent",
    "created_from",
    "created_to",
    "document_type",
];

/// Arguments that only some edit methods accept.
const METHOD_PARAMS: &[&str] = &["correspondent", "document_type", "add_tags", "remove_tags"];

const EDIT_METHODS: &[&str] = &[
    "set_correspondent",
    "set_document_type",
    "modify_tags",
    "delete",
];

pub(crate) const SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: GET_DOCUMENTS,
        description: "Search documents. At least one filter is required. Tag, correspondent \
                      and document type are given by name; names known to the archive match \
                      exactly, other names match case-insensitively as substrings. Returns the \
                      total match count and up to `limit` documents with a content preview.",
        fields: &[
            FieldSpec::optional("id", FieldType::Integer, "Exact document ID"),
            FieldSpec::optional("content", FieldType::String, "Text the document content contains"),
            FieldSpec::optional("title", FieldType::String, "Text the title contains"),
            FieldSpec::optional("tag", FieldType::String, "Tag name"),
            FieldSpec::optional("correspondent", FieldType::String, "Correspondent name"),
            FieldSpec::optional("created_from", FieldType::Date, "Created on or after (YYYY-MM-DD)"),
            FieldSpec::optional("created_to", FieldType::Date, "Created on or before (YYYY-MM-DD)"),
            FieldSpec::optional("document_type", FieldType::String, "Document type name"),
            FieldSpec::optional("limit", FieldType::Integer, "Maximum documents to return (default 10)"),
        ],
    },
    ToolSpec {
        name: EDIT_DOCUMENTS,
        description: "Edit several documents at once. Methods: 'set_correspondent' (needs \
                      correspondent), 'set_document_type' (needs document_type), 'modify_tags' \
                      (needs add_tags and/or remove_tags) and 'delete'. Names must match existing \
                      entities; create them first with the create_* tools. Unknown tag names in \
                      add_tags/remove_tags are ignored.",
        fields: &[
            FieldSpec::required("documentIds", FieldType::IntegerArray, "IDs of the documents to edit"),
            FieldSpec::required("method", FieldType::Enum(EDIT_METHODS), "Edit to apply"),
            FieldSpec::optional("correspondent", FieldType::String, "Correspondent name for set_correspondent"),
            FieldSpec::optional("document_type", FieldType::String, "Document type name for set_document_type"),
            FieldSpec::optional("add_tags", FieldType::StringArray, "Tag names to add for modify_tags"),
            FieldSpec::optional("remove_tags", FieldType::StringArray, "Tag names to remove for modify_tags"),
        ],
    },
];

/// Parsed `get_documents` arguments. Names are still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDocuments {
    /// Exact document ID
    pub id: Option<u64>,
    /// Content substring
    pub content: Option<String>,
    /// Title substring
    pub title: Option<String>,
    /// Tag name
    pub tag: Option<String>,
    /// Correspondent name
    pub correspondent: Option<String>,
    /// Document type name
    pub document_type: Option<String>,
    /// Lower date bound
    pub created_from: Option<NaiveDate>,
    /// Upper date bound
    pub created_to: Option<NaiveDate>,
    /// Page size
    pub limit: u32,
}

impl GetDocuments {
    pub(crate) fn parse(args: &Args<'_>) -> Result<Self> {
        if !DOCUMENT_FILTERS.iter().any(|f| args.has(f)) {
            return Err(McpError::constraint(
                DOCUMENT_FILTERS,
                "at least one filter is required",
            ));
        }

        let created_from = args.date("created_from")?;
        let created_to = args.date("created_to")?;
        if let (Some(from), Some(to)) = (created_from, created_to) {
            if from > to {
                return Err(McpError::constraint(
                    &["created_from", "created_to"],
                    format!("created_from ({}) is after created_to ({})", from, to),
                ));
            }
        }

        let limit = match args.u64("limit") {
            None => DEFAULT_LIMIT,
            Some(0) => return Err(McpError::invalid("limit", "must be at least 1")),
            Some(n) => u32::try_from(n).map_err(|_| McpError::invalid("limit", "too large"))?,
        };

        Ok(Self {
            id: args.u64("id"),
            content: args.string("content"),
            title: args.string("title"),
            tag: args.string("tag"),
            correspondent: args.string("correspondent"),
            document_type: args.string("document_type"),
            created_from,
            created_to,
            limit,
        })
    }

    /// Translate to the API's filter shape using the read-path name policy.
    pub fn to_query(&self, session: &McpSession) -> DocumentQuery {
        let read = |kind, name: &Option<String>| {
            name.as_deref().map(|n| session.filter_for_read(kind, n))
        };
        DocumentQuery {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            tag: read(EntityKind::Tag, &self.tag),
            correspondent: read(EntityKind::Correspondent, &self.correspondent),
            document_type: read(EntityKind::DocumentType, &self.document_type),
            created_from: self.created_from,
            created_to: self.created_to,
            page_size: self.limit,
        }
    }

    /// Run the search.
    pub async fn execute(self, session: &McpSession) -> Result<JsonValue> {
        let query = self.to_query(session);
        let page = session.api().search_documents(&query).await?;
        Ok(format::document_page(session.cache(), &page))
    }
}

/// The edit an `edit_documents` call asks for, with names still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMethod {
    /// Assign a correspondent by name
    SetCorrespondent(String),
    /// Assign a document type by name
    SetDocumentType(String),
    /// Add and remove tags by name
    ModifyTags {
        /// Names to add
        add: Vec<String>,
        /// Names to remove
        remove: Vec<String>,
    },
    /// Delete the documents
    Delete,
}

impl EditMethod {
    fn takes(&self, field: &str) -> bool {
        match self {
            EditMethod::SetCorrespondent(_) => field == "correspondent",
            EditMethod::SetDocumentType(_) => field == "document_type",
            EditMethod::ModifyTags { .. } => field == "add_tags" || field == "remove_tags",
            EditMethod::Delete => false,
        }
    }
}

/// Parsed `edit_documents` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDocuments {
    /// Documents to edit
    pub document_ids: Vec<u64>,
    /// What to do
    pub method: EditMethod,
}

impl EditDocuments {
    pub(crate) fn parse(args: &Args<'_>) -> Result<Self> {
        let mut document_ids = args.u64_list("documentIds");
        if document_ids.is_empty() {
            return Err(McpError::invalid("documentIds", "must contain at least one document ID"));
        }
        let mut seen = HashSet::new();
        document_ids.retain(|id| seen.insert(*id));

        let method_name = args.required_string("method")?;
        let method = match method_name.as_str() {
            "set_correspondent" => EditMethod::SetCorrespondent(
                required_for(args, "correspondent", "set_correspondent")?,
            ),
            "set_document_type" => EditMethod::SetDocumentType(
                required_for(args, "document_type", "set_document_type")?,
            ),
            "modify_tags" => {
                let add = args.string_list("add_tags");
                let remove = args.string_list("remove_tags");
                if add.is_empty() && remove.is_empty() {
                    return Err(McpError::constraint(
                        &["add_tags", "remove_tags"],
                        "modify_tags needs at least one tag to add or remove",
                    ));
                }
                EditMethod::ModifyTags { add, remove }
            }
            "delete" => EditMethod::Delete,
            other => {
                return Err(McpError::invalid(
                    "method",
                    format!("'{}' is not one of: {}", other, EDIT_METHODS.join(", ")),
                ))
            }
        };

        for &field in METHOD_PARAMS {
            if args.has(field) && !method.takes(field) {
                return Err(McpError::constraint(
                    &["method", field],
                    format!("method '{}' does not take '{}'", method_name, field),
                ));
            }
        }

        Ok(Self {
            document_ids,
            method,
        })
    }

    /// Resolve names with the write-path policies.
    ///
    /// Fails without side effects if a single correspondent or document type
    /// is unknown, or if no tag name in a `modify_tags` edit resolves.
    pub fn resolve(&self, session: &McpSession) -> Result<BulkEditRequest> {
        let method = match &self.method {
            EditMethod::SetCorrespondent(name) => BulkEditMethod::SetCorrespondent(
                session.resolve_for_write(EntityKind::Correspondent, name)?,
            ),
            EditMethod::SetDocumentType(name) => BulkEditMethod::SetDocumentType(
                session.resolve_for_write(EntityKind::DocumentType, name)?,
            ),
            EditMethod::ModifyTags { add, remove } => {
                let add_ids = session.resolve_tags_lossy(add);
                let remove_ids = session.resolve_tags_lossy(remove);
                if add_ids.is_empty() && remove_ids.is_empty() {
                    let names: Vec<String> = add.iter().chain(remove.iter()).cloned().collect();
                    let field = if add.is_empty() { "remove_tags" } else { "add_tags" };
                    return Err(McpError::Unresolved {
                        kind: EntityKind::Tag,
                        field: field.to_string(),
                        names,
                    });
                }
                BulkEditMethod::ModifyTags {
                    add: add_ids,
                    remove: remove_ids,
                }
            }
            EditMethod::Delete => BulkEditMethod::Delete,
        };

        Ok(BulkEditRequest {
            documents: self.document_ids.clone(),
            method,
        })
    }

    /// Resolve, then submit the bulk edit.
    pub async fn execute(self, session: &McpSession) -> Result<JsonValue> {
        let request = self.resolve(session)?;
        let response = session.api().bulk_edit(&request).await?;
        info!(
            method = request.method.name(),
            documents = request.documents.len(),
            "bulk edit applied"
        );
        Ok(format::bulk_edit(&request, response))
    }
}

fn required_for(args: &Args<'_>, field: &str, method: &str) -> Result<String> {
    args.string(field).ok_or_else(|| {
        McpError::constraint(
            &["method", field],
            format!("method '{}' requires '{}'", method, field),
        )
    })
}
