//! Recording stand-in for the Paperless API.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use paperless_mcp::{
    BulkEditRequest, Document, DocumentQuery, EntityKind, McpError, McpSession, MetadataCache,
    MetadataEntity, NewEntity, Page, PaperlessApi, Result,
};
use serde_json::{json, Map, Value as JsonValue};

#[derive(Default)]
pub struct State {
    pub tags: Vec<MetadataEntity>,
    pub correspondents: Vec<MetadataEntity>,
    pub document_types: Vec<MetadataEntity>,
    pub documents: Vec<Document>,
    pub calls: Vec<String>,
    pub queries: Vec<DocumentQuery>,
    pub bulk_edits: Vec<BulkEditRequest>,
    pub fail_lists: bool,
    pub fail_requests: bool,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    pub state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub fn with_tags(names: &[(u64, &str)]) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.tags = names.iter().map(|(id, n)| MetadataEntity::new(*id, *n)).collect();
            state.correspondents = vec![MetadataEntity::new(10, "ACME Corp")];
            state.document_types = vec![MetadataEntity::new(20, "Invoice")];
            state.next_id = 100;
        }
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn bulk_edits(&self) -> Vec<BulkEditRequest> {
        self.state.lock().unwrap().bulk_edits.clone()
    }

    pub fn last_query(&self) -> Option<DocumentQuery> {
        self.state.lock().unwrap().queries.last().cloned()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.lock().unwrap().calls.push(call.into());
    }

    fn unavailable() -> McpError {
        McpError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl PaperlessApi for FakeApi {
    async fn list(&self, kind: EntityKind) -> Result<Vec<MetadataEntity>> {
        self.record(format!("list {}", kind.path()));
        let state = self.state.lock().unwrap();
        if state.fail_lists {
            return Err(Self::unavailable());
        }
        Ok(match kind {
            EntityKind::Tag => state.tags.clone(),
            EntityKind::Correspondent => state.correspondents.clone(),
            EntityKind::DocumentType => state.document_types.clone(),
        })
    }

    async fn search_documents(&self, query: &DocumentQuery) -> Result<Page<Document>> {
        self.record("search_documents");
        let mut state = self.state.lock().unwrap();
        if state.fail_requests {
            return Err(Self::unavailable());
        }
        state.queries.push(query.clone());
        let results: Vec<Document> = state
            .documents
            .iter()
            .take(query.page_size as usize)
            .cloned()
            .collect();
        Ok(Page {
            count: state.documents.len() as u64,
            next: None,
            previous: None,
            results,
        })
    }

    async fn bulk_edit(&self, request: &BulkEditRequest) -> Result<JsonValue> {
        self.record("bulk_edit");
        let mut state = self.state.lock().unwrap();
        if state.fail_requests {
            return Err(Self::unavailable());
        }
        state.bulk_edits.push(request.clone());
        Ok(json!({ "result": "OK" }))
    }

    async fn create(&self, kind: EntityKind, entity: &NewEntity) -> Result<MetadataEntity> {
        self.record(format!("create {}", kind.path()));
        let mut state = self.state.lock().unwrap();
        if state.fail_requests {
            return Err(Self::unavailable());
        }
        state.next_id += 1;
        let mut created = MetadataEntity::new(state.next_id, entity.name.clone());
        created.color = entity.color.clone();
        match kind {
            EntityKind::Tag => state.tags.push(created.clone()),
            EntityKind::Correspondent => state.correspondents.push(created.clone()),
            EntityKind::DocumentType => state.document_types.push(created.clone()),
        }
        Ok(created)
    }

    async fn ping(&self) -> Result<()> {
        self.record("ping");
        Ok(())
    }
}

/// A session over `api` whose cache has been fully loaded.
pub async fn loaded_session(api: &FakeApi) -> McpSession {
    let session = McpSession::new(Arc::new(api.clone()), Arc::new(MetadataCache::new()));
    session.initialize().await.unwrap();
    api.state.lock().unwrap().calls.clear();
    session
}

pub fn args(value: JsonValue) -> Map<String, JsonValue> {
    value.as_object().cloned().unwrap_or_default()
}

pub fn document(id: u64, title: &str, tags: Vec<u64>) -> Document {
    Document {
        id,
        title: title.to_string(),
        content: format!("content of {}", title),
        tags,
        correspondent: Some(10),
        document_type: None,
        created: Some("2024-03-01".to_string()),
        added: None,
        modified: None,
    }
}
