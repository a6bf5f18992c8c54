//! Wire types for the Paperless-NGX REST API.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three metadata kinds that documents reference by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// Tags (many per document)
    Tag,
    /// Correspondents (at most one per document)
    Correspondent,
    /// Document types (at most one per document)
    DocumentType,
}

impl EntityKind {
    /// All kinds, in a fixed order.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Tag,
        EntityKind::Correspondent,
        EntityKind::DocumentType,
    ];

    /// Collection segment under `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Tag => "tags",
            EntityKind::Correspondent => "correspondents",
            EntityKind::DocumentType => "document_types",
        }
    }

    /// Argument name used by tools that accept a single entity of this kind.
    pub fn field_name(self) -> &'static str {
        match self {
            EntityKind::Tag => "tag",
            EntityKind::Correspondent => "correspondent",
            EntityKind::DocumentType => "document_type",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            EntityKind::Tag => 0,
            EntityKind::Correspondent => 1,
            EntityKind::DocumentType => 2,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Tag => "tag",
            EntityKind::Correspondent => "correspondent",
            EntityKind::DocumentType => "document type",
        })
    }
}

/// A tag, correspondent or document type as listed by the API.
///
/// The three kinds share this shape; `color` is only ever set for tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntity {
    /// Server-assigned ID
    pub id: u64,
    /// Display name
    pub name: String,
    /// Number of documents referencing this entity
    #[serde(default)]
    pub document_count: u64,
    /// Tag colour (`#RRGGBB`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl MetadataEntity {
    /// Create an entity with no documents attached.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            document_count: 0,
            color: None,
        }
    }
}

/// A document as returned by `GET /api/documents/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned ID
    pub id: u64,
    /// Title
    pub title: String,
    /// Full OCR'd text
    #[serde(default)]
    pub content: String,
    /// Tag IDs
    #[serde(default)]
    pub tags: Vec<u64>,
    /// Correspondent ID
    #[serde(default)]
    pub correspondent: Option<u64>,
    /// Document type ID
    #[serde(default)]
    pub document_type: Option<u64>,
    /// Creation date as stored in the archive
    #[serde(default)]
    pub created: Option<String>,
    /// When the document was added
    #[serde(default)]
    pub added: Option<DateTime<Utc>>,
    /// Last modification
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Paginated list envelope used by every collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Total number of matches across all pages
    pub count: u64,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

/// How a name-based filter is sent to the documents endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// Exact ID, resolved locally from the metadata cache
    Id(u64),
    /// Case-insensitive substring match performed by the server
    Contains(String),
}

/// Filters for `GET /api/documents/`. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Exact document ID
    pub id: Option<u64>,
    /// Substring of the title
    pub title: Option<String>,
    /// Substring of the full text
    pub content: Option<String>,
    /// Tag filter
    pub tag: Option<NameFilter>,
    /// Correspondent filter
    pub correspondent: Option<NameFilter>,
    /// Document type filter
    pub document_type: Option<NameFilter>,
    /// Inclusive lower bound on the created date
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the created date
    pub created_to: Option<NaiveDate>,
    /// Page size
    pub page_size: u32,
}

impl DocumentQuery {
    /// Render the query string pairs, only for filters that are set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.id {
            params.push(("id", id.to_string()));
        }
        if let Some(title) = &self.title {
            params.push(("title__icontains", title.clone()));
        }
        if let Some(content) = &self.content {
            params.push(("content__icontains", content.clone()));
        }
        match &self.tag {
            Some(NameFilter::Id(id)) => params.push(("tags__id__all", id.to_string())),
            Some(NameFilter::Contains(name)) => params.push(("tags__name__icontains", name.clone())),
            None => {}
        }
        match &self.correspondent {
            Some(NameFilter::Id(id)) => params.push(("correspondent__id", id.to_string())),
            Some(NameFilter::Contains(name)) => {
                params.push(("correspondent__name__icontains", name.clone()))
            }
            None => {}
        }
        match &self.document_type {
            Some(NameFilter::Id(id)) => params.push(("document_type__id", id.to_string())),
            Some(NameFilter::Contains(name)) => {
                params.push(("document_type__name__icontains", name.clone()))
            }
            None => {}
        }
        if let Some(from) = self.created_from {
            params.push(("created__date__gte", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.created_to {
            params.push(("created__date__lte", to.format("%Y-%m-%d").to_string()));
        }
        params.push(("page_size", self.page_size.to_string()));
        params
    }
}

/// A bulk-edit operation with its method-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkEditMethod {
    /// Assign one correspondent
    SetCorrespondent(u64),
    /// Assign one document type
    SetDocumentType(u64),
    /// Add and remove tags
    ModifyTags {
        /// Tag IDs to add
        add: Vec<u64>,
        /// Tag IDs to remove
        remove: Vec<u64>,
    },
    /// Delete the documents
    Delete,
}

impl BulkEditMethod {
    /// Method name as the API expects it.
    pub fn name(&self) -> &'static str {
        match self {
            BulkEditMethod::SetCorrespondent(_) => "set_correspondent",
            BulkEditMethod::SetDocumentType(_) => "set_document_type",
            BulkEditMethod::ModifyTags { .. } => "modify_tags",
            BulkEditMethod::Delete => "delete",
        }
    }

    fn parameters(&self) -> serde_json::Value {
        match self {
            BulkEditMethod::SetCorrespondent(id) => serde_json::json!({ "correspondent": id }),
            BulkEditMethod::SetDocumentType(id) => serde_json::json!({ "document_type": id }),
            BulkEditMethod::ModifyTags { add, remove } => serde_json::json!({
                "add_tags": add,
                "remove_tags": remove,
            }),
            BulkEditMethod::Delete => serde_json::json!({}),
        }
    }
}

/// Body of `POST /api/documents/bulk_edit/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEditRequest {
    /// Documents to edit
    pub documents: Vec<u64>,
    /// What to do with them
    pub method: BulkEditMethod,
}

impl BulkEditRequest {
    /// JSON body for the API.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "documents": self.documents,
            "method": self.method.name(),
            "parameters": self.method.parameters(),
        })
    }
}

/// Body of the `POST` create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEntity {
    /// Name of the new entity
    pub name: String,
    /// Tag colour; ignored for other kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}
