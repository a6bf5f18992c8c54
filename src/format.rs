//! Conversion of API results into the JSON summaries returned to agents.
//!
//! Agents get counts and names rather than raw API objects: document
//! references to tags, correspondents and types are resolved through the
//! cache on a best-effort basis.

use serde_json::{json, Map, Value as JsonValue};

use crate::cache::MetadataCache;
use crate::model::{BulkEditRequest, Document, EntityKind, MetadataEntity, Page};

/// Characters of document content included in search results.
pub const CONTENT_PREVIEW_CHARS: usize = 500;

/// One metadata entity.
pub fn entity_to_json(entity: &MetadataEntity) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("id".to_string(), json!(entity.id));
    obj.insert("name".to_string(), json!(entity.name));
    obj.insert("document_count".to_string(), json!(entity.document_count));
    if let Some(color) = &entity.color {
        obj.insert("color".to_string(), json!(color));
    }
    JsonValue::Object(obj)
}

/// A full listing of one kind.
pub fn entity_list(kind: EntityKind, entities: &[MetadataEntity]) -> JsonValue {
    let mut obj = Map::new();
    obj.insert("count".to_string(), json!(entities.len()));
    obj.insert(
        kind.path().to_string(),
        JsonValue::Array(entities.iter().map(entity_to_json).collect()),
    );
    JsonValue::Object(obj)
}

/// Result of a create call.
pub fn created(kind: EntityKind, entity: &MetadataEntity) -> JsonValue {
    json!({
        "created": true,
        "kind": kind.to_string(),
        "entity": entity_to_json(entity),
    })
}

/// One document with its metadata references named.
pub fn document_to_json(cache: &MetadataCache, doc: &Document) -> JsonValue {
    let tags: Vec<String> = cache
        .lookup_by_ids(EntityKind::Tag, Some(&doc.tags))
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.name)
        .collect();
    let correspondent = doc
        .correspondent
        .and_then(|id| cache.lookup_by_id(EntityKind::Correspondent, id))
        .map(|c| c.name);
    let document_type = doc
        .document_type
        .and_then(|id| cache.lookup_by_id(EntityKind::DocumentType, id))
        .map(|d| d.name);

    json!({
        "id": doc.id,
        "title": doc.title,
        "created": doc.created,
        "added": doc.added,
        "modified": doc.modified,
        "correspondent": correspondent,
        "document_type": document_type,
        "tags": tags,
        "content": truncate(&doc.content, CONTENT_PREVIEW_CHARS),
    })
}

/// A page of search results.
pub fn document_page(cache: &MetadataCache, page: &Page<Document>) -> JsonValue {
    json!({
        "total": page.count,
        "returned": page.results.len(),
        "documents": page
            .results
            .iter()
            .map(|doc| document_to_json(cache, doc))
            .collect::<Vec<_>>(),
    })
}

/// Outcome of a bulk edit.
pub fn bulk_edit(request: &BulkEditRequest, response: JsonValue) -> JsonValue {
    let mut body = request.to_body();
    if let Some(obj) = body.as_object_mut() {
        obj.insert("edited".to_string(), json!(request.documents.len()));
        obj.insert("result".to_string(), response);
    }
    body
}

/// Cut `text` to at most `max` characters.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
