//! Collection payload
//!
//! Documents are stored as immutable revisions in a `DashMap` keyed by
//! document key. `replace` and `remove` retire the previous revision through
//! the drop coordinator instead of mutating it, so a document handle keeps
//! the revision it was fetched with.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use reclaim_core::{validate_document_key, ReclaimError, ReclaimResult, ResourceKind};
use reclaim_storage::{Handle, Payload, Reclaimable, Resource};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::database::{DatabaseData, DatabaseHandle};
use super::document::{DocumentData, DocumentHandle};
use crate::coordinator::DropCoordinator;

/// Handle on a collection
pub type CollectionHandle = Handle<CollectionData>;

/// Identity of a stored document revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Document key
    pub key: String,
    /// Revision number, unique within the collection
    pub revision: u64,
}

/// A collection: its name and its documents index
pub struct CollectionData {
    name: String,
    database_name: String,
    this: Weak<Resource<CollectionData>>,
    database: Weak<Resource<DatabaseData>>,
    documents: DashMap<String, Arc<Resource<DocumentData>>>,
    next_key: AtomicU64,
    next_revision: AtomicU64,
    coordinator: DropCoordinator,
}

impl CollectionData {
    pub(crate) fn create(
        name: &str,
        database_name: &str,
        database: Weak<Resource<DatabaseData>>,
        coordinator: DropCoordinator,
    ) -> Arc<Resource<Self>> {
        Resource::new_cyclic(0, |this| CollectionData {
            name: name.to_string(),
            database_name: database_name.to_string(),
            this: this.clone(),
            database,
            documents: DashMap::new(),
            next_key: AtomicU64::new(1),
            next_revision: AtomicU64::new(1),
            coordinator,
        })
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the database this collection was created in
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Open a handle on the owning database, if it is still live
    pub fn database(&self) -> ReclaimResult<DatabaseHandle> {
        self.database
            .upgrade()
            .and_then(|db| Handle::acquire(&db))
            .ok_or_else(|| {
                ReclaimError::not_found(ResourceKind::Database, self.database_name.as_str())
            })
    }

    /// Whether this collection has been dropped
    pub fn is_dropped(&self) -> bool {
        self.this.upgrade().map_or(true, |c| c.is_dropped())
    }

    fn dropped_error(&self) -> ReclaimError {
        ReclaimError::not_found(ResourceKind::Collection, self.name.as_str())
    }

    fn new_revision(&self, key: &str, body: JsonValue) -> Arc<Resource<DocumentData>> {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed);
        DocumentData::create(key, revision, body, self.this.clone())
    }

    /// Number of documents
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    /// Whether a document with this key exists
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Sorted document keys
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.documents.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Insert a document under an explicit key
    pub fn save(&self, key: &str, body: JsonValue) -> ReclaimResult<DocumentMeta> {
        validate_document_key(key)
            .map_err(|e| ReclaimError::invalid_name(ResourceKind::Document, key, e))?;

        match self.documents.entry(key.to_string()) {
            _ if self.is_dropped() => Err(self.dropped_error()),
            Entry::Occupied(_) => Err(ReclaimError::already_exists(ResourceKind::Document, key)),
            Entry::Vacant(slot) => {
                let document = self.new_revision(key, body);
                let meta = document.payload().meta();
                slot.insert(document);
                Ok(meta)
            }
        }
    }

    /// Insert a document under a generated key
    pub fn insert(&self, body: JsonValue) -> ReclaimResult<DocumentMeta> {
        loop {
            let key = self.next_key.fetch_add(1, Ordering::Relaxed).to_string();
            match self.save(&key, body.clone()) {
                Err(ReclaimError::AlreadyExists { .. }) => continue,
                result => return result,
            }
        }
    }

    /// Install a new revision of an existing document
    ///
    /// The previous revision is dropped; handles on it keep reading it.
    pub fn replace(&self, key: &str, body: JsonValue) -> ReclaimResult<DocumentMeta> {
        let (previous, meta) = {
            let mut slot = match self.documents.get_mut(key) {
                _ if self.is_dropped() => return Err(self.dropped_error()),
                Some(slot) => slot,
                None => return Err(ReclaimError::not_found(ResourceKind::Document, key)),
            };
            let document = self.new_revision(key, body);
            let meta = document.payload().meta();
            (std::mem::replace(slot.value_mut(), document), meta)
        };

        self.coordinator.retire(previous)?;
        debug!(
            target: "reclaim::catalog",
            collection = %self.name,
            key,
            revision = meta.revision,
            "Document replaced"
        );
        Ok(meta)
    }

    /// Remove a document; handles on it keep reading it
    pub fn remove(&self, key: &str) -> ReclaimResult<()> {
        match self.documents.remove_if(key, |_, _| !self.is_dropped()) {
            Some((_, previous)) => {
                self.coordinator.retire(previous)?;
                Ok(())
            }
            None if self.is_dropped() => Err(self.dropped_error()),
            None => Err(ReclaimError::not_found(ResourceKind::Document, key)),
        }
    }

    /// Open a handle on the current revision of a document
    ///
    /// The handle is acquired under the shard read guard: `replace` retires
    /// the previous revision only after releasing its write guard, so a fetch
    /// either sees the new revision or pins the old one before it is flagged.
    pub fn document(&self, key: &str) -> ReclaimResult<DocumentHandle> {
        if self.is_dropped() {
            return Err(self.dropped_error());
        }
        match self.documents.get(key).and_then(|e| Handle::acquire(e.value())) {
            Some(handle) => Ok(handle),
            None if self.is_dropped() => Err(self.dropped_error()),
            None => Err(ReclaimError::not_found(ResourceKind::Document, key)),
        }
    }
}

impl Payload for CollectionData {
    const KIND: ResourceKind = ResourceKind::Collection;

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<Arc<dyn Reclaimable>> {
        self.documents
            .iter()
            .map(|e| Arc::clone(e.value()) as Arc<dyn Reclaimable>)
            .collect()
    }

    fn purge(&self) {
        self.documents.clear();
    }
}

impl std::fmt::Debug for CollectionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionData")
            .field("name", &self.name)
            .field("database", &self.database_name)
            .field("count", &self.count())
            .finish()
    }
}
