//! Drop coordinator
//!
//! Sequences logical deletion:
//! 1. Detach the resource from its owner's index and flag it `Dropped`, both
//!    under the owner's lock (the single linearization point)
//! 2. Flag every descendant reachable through the children index, leaving
//!    refcounts untouched
//! 3. Bury everything that was flagged so the reclaimer can free it
//! 4. For databases, give back the catalog's own reference
//!
//! Nothing here waits for outstanding handles.

use std::sync::Arc;

use reclaim_core::ReclaimResult;
use reclaim_storage::{Graveyard, Reclaimable};
use tracing::info;

use crate::catalog::Catalog;

/// Orchestrates logical deletion of databases, collections and documents
#[derive(Debug, Clone)]
pub struct DropCoordinator {
    graveyard: Arc<Graveyard>,
}

impl DropCoordinator {
    /// Create a coordinator burying into `graveyard`
    pub fn new(graveyard: Arc<Graveyard>) -> Self {
        Self { graveyard }
    }

    /// Graveyard shared with the reclaimer
    pub fn graveyard(&self) -> &Arc<Graveyard> {
        &self.graveyard
    }

    /// Drop a database by name
    ///
    /// Returns as soon as the name is gone from the catalog; handles opened
    /// earlier keep working until they are released.
    pub fn drop_database(&self, catalog: &Catalog, name: &str) -> ReclaimResult<()> {
        let database = catalog.detach(name)?;
        let flagged = self.propagate(database.clone())?;
        let remaining = database.release_ref()?;

        info!(
            target: "reclaim::drop",
            database = name,
            id = %database.id(),
            flagged,
            outstanding_handles = remaining,
            "Database dropped"
        );
        Ok(())
    }

    /// Flag a live resource and its descendants, then bury them
    ///
    /// Returns the number of resources flagged; zero if it was already dropped.
    pub fn retire(&self, resource: Arc<dyn Reclaimable>) -> ReclaimResult<usize> {
        if !resource.mark_dropped() {
            return Ok(0);
        }
        self.propagate(resource)
    }

    /// Flag the descendants of an already-flagged root and bury the subtree
    ///
    /// Children are collected before burying their parent: once buried, a
    /// parent may be reclaimed (and its index purged) at any moment.
    pub fn propagate(&self, root: Arc<dyn Reclaimable>) -> ReclaimResult<usize> {
        let mut stack = vec![root];
        let mut flagged = 0;

        while let Some(resource) = stack.pop() {
            let children = resource.children();
            self.graveyard.bury(resource)?;
            flagged += 1;

            for child in children {
                // Already-dropped children were buried by whoever dropped them
                if child.mark_dropped() {
                    stack.push(child);
                }
            }
        }

        Ok(flagged)
    }
}
