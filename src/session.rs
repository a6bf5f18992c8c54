//! MCP session state.
//!
//! Pairs the document service handle with the shared metadata cache and owns
//! the name-resolution policies the tools apply.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::MetadataCache;
use crate::client::PaperlessApi;
use crate::error::{McpError, Result};
use crate::model::{EntityKind, NameFilter};

/// MCP session state.
///
/// Cloning is cheap; clones share the same API client and cache.
#[derive(Clone)]
pub struct McpSession {
    api: Arc<dyn PaperlessApi>,
    cache: Arc<MetadataCache>,
}

impl McpSession {
    /// Create a session over an API handle and a cache.
    pub fn new(api: Arc<dyn PaperlessApi>, cache: Arc<MetadataCache>) -> Self {
        Self { api, cache }
    }

    /// The document service.
    pub fn api(&self) -> &dyn PaperlessApi {
        self.api.as_ref()
    }

    /// The metadata cache.
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Load the full metadata cache.
    pub async fn initialize(&self) -> Result<()> {
        self.cache.initialize(self.api()).await
    }

    /// Make sure a kind has been loaded at least once.
    pub async fn ensure_loaded(&self, kind: EntityKind) -> Result<()> {
        if !self.cache.is_loaded(kind) {
            self.cache.refresh_kind(self.api(), kind).await?;
        }
        Ok(())
    }

    /// Reload a kind after a successful create.
    ///
    /// The create already happened, so a failure here is only logged.
    pub async fn refresh_after_create(&self, kind: EntityKind) {
        if let Err(e) = self.cache.refresh_kind(self.api(), kind).await {
            warn!(%kind, error = %e, "cache refresh after create failed");
        }
    }

    /// Read-path policy: filter by ID when the cache knows the name, otherwise
    /// let the server do a case-insensitive substring match. Never fails.
    pub fn filter_for_read(&self, kind: EntityKind, name: &str) -> NameFilter {
        match self.cache.lookup_id_by_name(kind, name) {
            Some(id) => NameFilter::Id(id),
            None => {
                debug!(%kind, name, "name not cached, using server-side match");
                NameFilter::Contains(name.trim().to_string())
            }
        }
    }

    /// Write-path policy for a single entity: the name must be cached.
    pub fn resolve_for_write(&self, kind: EntityKind, name: &str) -> Result<u64> {
        self.cache
            .lookup_id_by_name(kind, name)
            .ok_or_else(|| McpError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    /// Write-path policy for tag lists: unknown names are dropped.
    pub fn resolve_tags_lossy(&self, names: &[String]) -> Vec<u64> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            match self.cache.lookup_id_by_name(EntityKind::Tag, name) {
                Some(id) if !ids.contains(&id) => ids.push(id),
                Some(_) => {}
                None => debug!(name = name.as_str(), "dropping unknown tag"),
            }
        }
        ids
    }
}
