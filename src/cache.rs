//! In-memory snapshot of tags, correspondents and document types.
//!
//! Tools receive human-readable names from the agent while the API wants IDs.
//! `MetadataCache` keeps one `id -> entity` mapping per [`EntityKind`] and
//! answers both directions without a round-trip.
//!
//! Each mapping is published as an `Arc<BTreeMap>`. A reload builds the new map
//! completely and then swaps the `Arc` under a short write lock, so a reader
//! holding the previous snapshot is never exposed to a half-built mapping.
//! `BTreeMap` ordering makes iteration (and therefore duplicate-name
//! resolution) deterministic: the lowest ID wins.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::client::PaperlessApi;
use crate::error::Result;
use crate::model::{EntityKind, MetadataEntity};

type Mapping = Arc<BTreeMap<u64, MetadataEntity>>;

struct Slot {
    mapping: Mapping,
    loaded: bool,
}

/// Process-wide metadata cache, shared by handle.
pub struct MetadataCache {
    slots: [RwLock<Slot>; 3],
    last_updated: RwLock<Option<DateTime<Utc>>>,
}

impl MetadataCache {
    /// Create an empty cache. Every lookup misses until a load succeeds.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| {
                RwLock::new(Slot {
                    mapping: Arc::new(BTreeMap::new()),
                    loaded: false,
                })
            }),
            last_updated: RwLock::new(None),
        }
    }

    /// Load all three kinds concurrently and install them together.
    ///
    /// If any listing fails nothing is installed and the previous state is
    /// kept.
    pub async fn initialize(&self, api: &dyn PaperlessApi) -> Result<()> {
        let (tags, correspondents, document_types) = tokio::try_join!(
            api.list(EntityKind::Tag),
            api.list(EntityKind::Correspondent),
            api.list(EntityKind::DocumentType),
        )?;

        info!(
            tags = tags.len(),
            correspondents = correspondents.len(),
            document_types = document_types.len(),
            "metadata cache loaded"
        );

        self.install(EntityKind::Tag, tags);
        self.install(EntityKind::Correspondent, correspondents);
        self.install(EntityKind::DocumentType, document_types);
        *self
            .last_updated
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
        Ok(())
    }

    /// Re-fetch a single kind and replace its mapping.
    pub async fn refresh_kind(&self, api: &dyn PaperlessApi, kind: EntityKind) -> Result<()> {
        let entities = api.list(kind).await?;
        debug!(%kind, count = entities.len(), "metadata refreshed");
        self.install(kind, entities);
        Ok(())
    }

    /// Replace one mapping with the given listing.
    pub fn install(&self, kind: EntityKind, entities: Vec<MetadataEntity>) {
        let mapping: BTreeMap<u64, MetadataEntity> =
            entities.into_iter().map(|e| (e.id, e)).collect();
        let mapping = Arc::new(mapping);

        let mut slot = self.slots[kind.index()]
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        slot.mapping = mapping;
        slot.loaded = true;
    }

    fn snapshot(&self, kind: EntityKind) -> Mapping {
        self.slots[kind.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .mapping
            .clone()
    }

    /// Entities for the given IDs, skipping unknown ones.
    ///
    /// Returns `None` when `ids` is missing or empty.
    pub fn lookup_by_ids(&self, kind: EntityKind, ids: Option<&[u64]>) -> Option<Vec<MetadataEntity>> {
        let ids = ids.filter(|ids| !ids.is_empty())?;
        let mapping = self.snapshot(kind);
        Some(ids.iter().filter_map(|id| mapping.get(id).cloned()).collect())
    }

    /// A single entity by ID.
    pub fn lookup_by_id(&self, kind: EntityKind, id: u64) -> Option<MetadataEntity> {
        self.snapshot(kind).get(&id).cloned()
    }

    /// ID of the entity whose name matches, ignoring case and surrounding
    /// whitespace. Duplicates resolve to the lowest ID.
    pub fn lookup_id_by_name(&self, kind: EntityKind, name: &str) -> Option<u64> {
        let wanted = normalize(name);
        self.snapshot(kind)
            .values()
            .find(|entity| normalize(&entity.name) == wanted)
            .map(|entity| entity.id)
    }

    /// All entities of a kind, ordered by ID.
    pub fn entities(&self, kind: EntityKind) -> Vec<MetadataEntity> {
        self.snapshot(kind).values().cloned().collect()
    }

    /// Whether the kind has been loaded at least once.
    pub fn is_loaded(&self, kind: EntityKind) -> bool {
        self.slots[kind.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded
    }

    /// Time of the last successful full reload.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        *self
            .last_updated
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
