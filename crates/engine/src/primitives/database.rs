//! Database payload

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use reclaim_core::{validate_collection_name, ReclaimError, ReclaimResult, ResourceKind};
use reclaim_storage::{Handle, Payload, Reclaimable, Resource};
use tracing::info;

use super::collection::{CollectionData, CollectionHandle};
use crate::coordinator::DropCoordinator;

/// Handle on a database
pub type DatabaseHandle = Handle<DatabaseData>;

/// A database: its name and its collections index
pub struct DatabaseData {
    name: String,
    this: Weak<Resource<DatabaseData>>,
    collections: RwLock<BTreeMap<String, Arc<Resource<CollectionData>>>>,
    coordinator: DropCoordinator,
}

impl DatabaseData {
    /// Allocate a database carrying the catalog's reference
    pub(crate) fn create(name: &str, coordinator: DropCoordinator) -> Arc<Resource<Self>> {
        Resource::new_cyclic(1, |this| DatabaseData {
            name: name.to_string(),
            this: this.clone(),
            collections: RwLock::new(BTreeMap::new()),
            coordinator,
        })
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this database has been dropped
    pub fn is_dropped(&self) -> bool {
        self.this.upgrade().map_or(true, |db| db.is_dropped())
    }

    fn dropped_error(&self) -> ReclaimError {
        ReclaimError::not_found(ResourceKind::Database, self.name.as_str())
    }

    /// Create a collection and return a handle to it
    pub fn create_collection(&self, name: &str) -> ReclaimResult<CollectionHandle> {
        validate_collection_name(name)
            .map_err(|e| ReclaimError::invalid_name(ResourceKind::Collection, name, e))?;

        let mut collections = self.collections.write();
        if self.is_dropped() {
            return Err(self.dropped_error());
        }
        if collections.contains_key(name) {
            return Err(ReclaimError::already_exists(ResourceKind::Collection, name));
        }

        let collection = CollectionData::create(
            name,
            &self.name,
            self.this.clone(),
            self.coordinator.clone(),
        );
        let handle = Handle::acquire(&collection).ok_or_else(|| {
            ReclaimError::invariant(format!("new collection '{}' is not live", name))
        })?;
        collections.insert(name.to_string(), collection);

        info!(
            target: "reclaim::catalog",
            database = %self.name,
            collection = name,
            "Collection created"
        );
        Ok(handle)
    }

    /// Open a new handle on a live collection
    pub fn collection(&self, name: &str) -> ReclaimResult<CollectionHandle> {
        let collections = self.collections.read();
        if self.is_dropped() {
            return Err(self.dropped_error());
        }
        collections
            .get(name)
            .and_then(Handle::acquire)
            .ok_or_else(|| ReclaimError::not_found(ResourceKind::Collection, name))
    }

    /// Sorted names of the collections in this database
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// Number of collections
    pub fn collection_count(&self) -> usize {
        self.collections.read().len()
    }

    /// Drop one collection and its documents
    pub fn drop_collection(&self, name: &str) -> ReclaimResult<()> {
        let collection = {
            let mut collections = self.collections.write();
            if self.is_dropped() {
                return Err(self.dropped_error());
            }
            let collection = collections
                .remove(name)
                .ok_or_else(|| ReclaimError::not_found(ResourceKind::Collection, name))?;
            collection.mark_dropped();
            collection
        };

        let flagged = self.coordinator.propagate(collection)?;
        info!(
            target: "reclaim::drop",
            database = %self.name,
            collection = name,
            flagged,
            "Collection dropped"
        );
        Ok(())
    }
}

impl Payload for DatabaseData {
    const KIND: ResourceKind = ResourceKind::Database;

    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> Vec<Arc<dyn Reclaimable>> {
        self.collections
            .read()
            .values()
            .map(|c| Arc::clone(c) as Arc<dyn Reclaimable>)
            .collect()
    }

    fn purge(&self) {
        self.collections.write().clear();
    }
}

impl std::fmt::Debug for DatabaseData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseData")
            .field("name", &self.name)
            .field("collections", &self.collection_names())
            .finish()
    }
}
