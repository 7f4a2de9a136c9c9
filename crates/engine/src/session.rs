//! Caller-side database context
//!
//! A session always holds a handle on its current database. Switching away
//! releases that handle; a database dropped while it is current stays
//! readable through the session until it switches.

use std::sync::Arc;

use reclaim_core::{ReclaimError, ReclaimResult};
use tracing::debug;

use crate::engine::Engine;
use crate::primitives::DatabaseHandle;

/// Active-database context over a shared engine
pub struct Session {
    current: DatabaseHandle,
    engine: Arc<Engine>,
}

impl Session {
    /// Start a session in the system database
    pub fn new(engine: Arc<Engine>) -> ReclaimResult<Self> {
        let current = engine.open_database(engine.system_database())?;
        Ok(Self { current, engine })
    }

    /// Switch the current database
    ///
    /// On failure the session stays where it was.
    pub fn use_database(&mut self, name: &str) -> ReclaimResult<()> {
        let next = self.engine.open_database(name)?;
        let previous = std::mem::replace(&mut self.current, next);
        debug!(
            target: "reclaim::session",
            from = previous.name(),
            to = name,
            "Switched database"
        );
        previous.release()
    }

    /// Handle on the current database
    pub fn current(&self) -> &DatabaseHandle {
        &self.current
    }

    /// Name of the current database
    pub fn current_name(&self) -> &str {
        self.current.name()
    }

    /// Create a database; the current database does not change
    pub fn create_database(&self, name: &str) -> ReclaimResult<DatabaseHandle> {
        self.engine.create_database(name)
    }

    /// Drop a database
    ///
    /// Only permitted from the system database.
    pub fn drop_database(&self, name: &str) -> ReclaimResult<()> {
        if self.current_name() != self.engine.system_database() {
            return Err(ReclaimError::forbidden(format!(
                "databases can only be dropped from '{}', current is '{}'",
                self.engine.system_database(),
                self.current_name()
            )));
        }
        self.engine.drop_database(name)
    }

    /// Sorted names of live databases
    pub fn list_databases(&self) -> Vec<String> {
        self.engine.list_databases()
    }

    /// The shared engine
    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current_name())
            .field("current_dropped", &self.current.is_dropped())
            .finish()
    }
}
