//! Metadata tools.
//!
//! Tools: list_tags, list_correspondents, list_document_types,
//! create_correspondent, create_document_type, create_tag

use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::Result;
use crate::format;
use crate::model::{EntityKind, NewEntity};
use crate::session::McpSession;
use crate::tools::args::{Args, FieldSpec, FieldType};
use crate::tools::ToolSpec;

pub(crate) const LIST_TAGS: &str = "list_tags";
pub(crate) const LIST_CORRESPONDENTS: &str = "list_correspondents";
pub(crate) const LIST_DOCUMENT_TYPES: &str = "list_document_types";
pub(crate) const CREATE_CORRESPONDENT: &str = "create_correspondent";
pub(crate) const CREATE_DOCUMENT_TYPE: &str = "create_document_type";
pub(crate) const CREATE_TAG: &str = "create_tag";

const NAME_FIELD: FieldSpec = FieldSpec::required("name", FieldType::String, "Name of the new entity");

pub(crate) const SPECS: &[ToolSpec] = &[
    ToolSpec {
        name: LIST_TAGS,
        description: "List all tags in the document archive with their IDs and document \
                      counts. Use the names returned here for the tag filters of \
                      get_documents and edit_documents.",
        fields: &[],
    },
    ToolSpec {
        name: LIST_CORRESPONDENTS,
        description: "List all correspondents (senders and recipients of documents) with \
                      their IDs and document counts.",
        fields: &[],
    },
    ToolSpec {
        name: LIST_DOCUMENT_TYPES,
        description: "List all document types (e.g. invoice, contract) with their IDs and \
                      document counts.",
        fields: &[],
    },
    ToolSpec {
        name: CREATE_CORRESPONDENT,
        description: "Create a new correspondent. It can be used by name in edit_documents \
                      immediately afterwards.",
        fields: &[NAME_FIELD],
    },
    ToolSpec {
        name: CREATE_DOCUMENT_TYPE,
        description: "Create a new document type. It can be used by name in edit_documents \
                      immediately afterwards.",
        fields: &[NAME_FIELD],
    },
    ToolSpec {
        name: CREATE_TAG,
        description: "Create a new tag, optionally with a colour. It can be used by name in \
                      edit_documents immediately afterwards.",
        fields: &[
            NAME_FIELD,
            FieldSpec::optional("color", FieldType::Color, "Hex colour, #RRGGBB or #RGB"),
        ],
    },
];

/// Arguments of the create tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntity {
    /// Name of the new entity
    pub name: String,
    /// Tag colour; always `None` for other kinds
    pub color: Option<String>,
}

impl CreateEntity {
    pub(crate) fn parse(args: &Args<'_>) -> Result<Self> {
        Ok(Self {
            name: args.required_string("name")?,
            color: args.string("color").map(|c| normalize_color(&c)),
        })
    }

    /// Create the entity, then reload its kind so the name resolves at once.
    pub async fn execute(self, session: &McpSession, kind: EntityKind) -> Result<JsonValue> {
        let entity = NewEntity {
            name: self.name,
            color: self.color,
        };
        let created = session.api().create(kind, &entity).await?;
        info!(%kind, id = created.id, name = created.name.as_str(), "created");

        session.refresh_after_create(kind).await;
        Ok(format::created(kind, &created))
    }
}

/// Lowercase `#rrggbb`. Paperless rejects the short `#rgb` form.
fn normalize_color(color: &str) -> String {
    let hex = color.trim_start_matches('#').to_lowercase();
    if hex.len() == 3 {
        let long: String = hex.chars().flat_map(|c| [c, c]).collect();
        format!("#{}", long)
    } else {
        format!("#{}", hex)
    }
}

/// Every cached entity of a kind, loading the kind first if needed.
pub async fn list(session: &McpSession, kind: EntityKind) -> Result<JsonValue> {
    session.ensure_loaded(kind).await?;
    let entities = session.cache().entities(kind);
    Ok(format::entity_list(kind, &entities))
}
