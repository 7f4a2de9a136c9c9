//! Database catalog
//!
//! Maps live database names to their resource objects. Removal from the
//! catalog is what makes a database invisible to `list` and `lookup`.
//!
//! All reads and writes of the map go through one `RwLock`, so a `list()` or
//! `lookup()` that starts after `drop()` returned can never see the name.
//! Uses parking_lot::RwLock to avoid lock poisoning on panic.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use reclaim_core::{ReclaimError, ReclaimResult, ResourceKind};
use reclaim_storage::{Handle, Resource};
use tracing::info;

use crate::coordinator::DropCoordinator;
use crate::primitives::{DatabaseData, DatabaseHandle};

/// Registry of live databases
///
/// Each entry carries one reference owned by the catalog itself; it is given
/// back when the database is dropped.
pub struct Catalog {
    entries: RwLock<BTreeMap<String, Arc<Resource<DatabaseData>>>>,
    coordinator: DropCoordinator,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(coordinator: DropCoordinator) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            coordinator,
        }
    }

    /// Create a database and return a handle to it
    ///
    /// Name validation is the caller's concern: the catalog also hosts the
    /// system database, which does not follow user naming rules.
    pub fn create(&self, name: &str) -> ReclaimResult<DatabaseHandle> {
        let mut entries = self.entries.write();
        if entries.contains_key(name) {
            return Err(ReclaimError::already_exists(ResourceKind::Database, name));
        }

        let database = DatabaseData::create(name, self.coordinator.clone());
        let handle = Handle::acquire(&database).ok_or_else(|| {
            ReclaimError::invariant(format!("new database '{}' is not live", name))
        })?;
        entries.insert(name.to_string(), database);

        info!(target: "reclaim::catalog", database = name, id = %handle.id(), "Database created");
        Ok(handle)
    }

    /// Open a new handle on a live database
    pub fn lookup(&self, name: &str) -> ReclaimResult<DatabaseHandle> {
        let entries = self.entries.read();
        entries
            .get(name)
            .and_then(Handle::acquire)
            .ok_or_else(|| ReclaimError::not_found(ResourceKind::Database, name))
    }

    /// Snapshot of live database names, sorted
    pub fn list(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Whether `name` is a live database
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Number of live databases
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the catalog has no databases
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop a database; see [`DropCoordinator::drop_database`]
    pub fn drop(&self, name: &str) -> ReclaimResult<()> {
        self.coordinator.drop_database(self, name)
    }

    /// Remove an entry and flag it dropped in one step under the write lock
    ///
    /// The catalog's reference is handed over to the caller, who must
    /// release it.
    pub(crate) fn detach(&self, name: &str) -> ReclaimResult<Arc<Resource<DatabaseData>>> {
        let mut entries = self.entries.write();
        let database = entries
            .remove(name)
            .ok_or_else(|| ReclaimError::not_found(ResourceKind::Database, name))?;
        database.mark_dropped();
        Ok(database)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("databases", &self.list())
            .finish()
    }
}
