//! Engine facade
//!
//! Owns the catalog, the graveyard and the reclaimer, and exposes the
//! database / collection / document operations callers use. Every operation
//! goes through the one `Catalog` instance owned here; there is no global
//! lookup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reclaim_core::{validate_database_name, ReclaimError, ReclaimResult, ResourceKind};
use reclaim_storage::{Graveyard, Handle, Payload, ReclaimStats, Reclaimer, SweepReport};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::{EngineConfig, CONFIG_FILE_NAME};
use crate::coordinator::DropCoordinator;
use crate::primitives::{CollectionHandle, DatabaseHandle, DocumentHandle};

/// Embedded document engine with deferred reclamation of dropped data
///
/// Dropping a database removes it from the catalog immediately; handles
/// opened earlier keep reading their data until released, and the reclaimer
/// frees everything once nothing references it anymore.
///
/// # Example
///
/// ```text
/// use reclaim_engine::Engine;
/// use serde_json::json;
///
/// let engine = Engine::ephemeral()?;
/// let db = engine.create_database("X")?;
/// let c = engine.create_collection(&db, "c")?;
/// c.save("k", json!({"value": 1}))?;
///
/// engine.drop_database("X")?;
/// assert_eq!(c.count(), 1);
/// ```
pub struct Engine {
    config: EngineConfig,
    data_dir: Option<PathBuf>,
    catalog: Catalog,
    graveyard: Arc<Graveyard>,
    reclaimer: Reclaimer,
}

impl Engine {
    /// Open an engine configured from `reclaim.toml` in `path`
    ///
    /// # Flow
    ///
    /// 1. Create the directory if needed
    /// 2. Write a default `reclaim.toml` if none exists
    /// 3. Load and validate it
    /// 4. Build the engine
    pub fn open<P: AsRef<Path>>(path: P) -> ReclaimResult<Arc<Self>> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&config_path)?;
        let cfg = EngineConfig::from_file(&config_path)?;

        Self::build(cfg, Some(data_dir))
    }

    /// Open an engine in `path` with an explicit configuration
    ///
    /// The configuration is written to `reclaim.toml` so a later
    /// [`Engine::open`] picks up the same settings.
    pub fn open_with_config<P: AsRef<Path>>(path: P, cfg: EngineConfig) -> ReclaimResult<Arc<Self>> {
        cfg.validate()?;
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        cfg.write_to_file(&data_dir.join(CONFIG_FILE_NAME))?;

        Self::build(cfg, Some(data_dir))
    }

    /// Build an in-memory engine with an explicit configuration
    pub fn with_config(cfg: EngineConfig) -> ReclaimResult<Arc<Self>> {
        Self::build(cfg, None)
    }

    /// Build an in-memory engine with the default configuration
    pub fn ephemeral() -> ReclaimResult<Arc<Self>> {
        Self::build(EngineConfig::default(), None)
    }

    fn build(cfg: EngineConfig, data_dir: Option<PathBuf>) -> ReclaimResult<Arc<Self>> {
        cfg.validate()?;

        let graveyard = Arc::new(Graveyard::new());
        let catalog = Catalog::new(DropCoordinator::new(Arc::clone(&graveyard)));
        let reclaimer = Reclaimer::new(Arc::clone(&graveyard), cfg.reclaim_interval());

        // Handle dropped immediately: the catalog keeps its own reference
        catalog.create(&cfg.system_database)?;

        if cfg.start_reclaimer {
            reclaimer.start()?;
        }

        info!(
            target: "reclaim::engine",
            data_dir = ?data_dir,
            system_database = %cfg.system_database,
            reclaim_interval_ms = cfg.reclaim_interval_ms,
            reclaimer_running = reclaimer.is_running(),
            "Engine opened"
        );

        Ok(Arc::new(Self {
            config: cfg,
            data_dir,
            catalog,
            graveyard,
            reclaimer,
        }))
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Data directory, `None` for in-memory engines
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Name of the undroppable system database
    pub fn system_database(&self) -> &str {
        &self.config.system_database
    }

    /// The database catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ========================================================================
    // Databases
    // ========================================================================

    /// Create a database and return a handle to it
    pub fn create_database(&self, name: &str) -> ReclaimResult<DatabaseHandle> {
        if name != self.system_database() {
            validate_database_name(name)
                .map_err(|e| ReclaimError::invalid_name(ResourceKind::Database, name, e))?;
        }
        self.catalog.create(name)
    }

    /// Open a live database by name
    pub fn open_database(&self, name: &str) -> ReclaimResult<DatabaseHandle> {
        self.catalog.lookup(name)
    }

    /// Sorted names of live databases, including the system database
    pub fn list_databases(&self) -> Vec<String> {
        self.catalog.list()
    }

    /// Drop a database
    ///
    /// Returns once the name is gone; outstanding handles stay readable.
    pub fn drop_database(&self, name: &str) -> ReclaimResult<()> {
        if name == self.system_database() {
            return Err(ReclaimError::forbidden(format!(
                "cannot drop system database '{}'",
                name
            )));
        }
        self.catalog.drop(name)
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// Create a collection in `db`
    pub fn create_collection(
        &self,
        db: &DatabaseHandle,
        name: &str,
    ) -> ReclaimResult<CollectionHandle> {
        db.create_collection(name)
    }

    /// Open a live collection in `db`
    pub fn open_collection(&self, db: &DatabaseHandle, name: &str) -> ReclaimResult<CollectionHandle> {
        db.collection(name)
    }

    /// Sorted names of the live collections in `db`
    pub fn list_collections(&self, db: &DatabaseHandle) -> Vec<String> {
        db.collection_names()
    }

    /// Drop one collection of `db`
    pub fn drop_collection(&self, db: &DatabaseHandle, name: &str) -> ReclaimResult<()> {
        db.drop_collection(name)
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Fetch the current revision of a document
    pub fn fetch_document(&self, coll: &CollectionHandle, key: &str) -> ReclaimResult<DocumentHandle> {
        coll.document(key)
    }

    /// Fetch the current revision of the document behind `doc`
    pub fn refresh_document(&self, doc: &DocumentHandle) -> ReclaimResult<DocumentHandle> {
        doc.refresh()
    }

    // ========================================================================
    // Reclamation
    // ========================================================================

    /// Release a handle explicitly, surfacing accounting errors
    pub fn release<T: Payload>(&self, handle: Handle<T>) -> ReclaimResult<()> {
        handle.release()
    }

    /// The background reclaimer
    pub fn reclaimer(&self) -> &Reclaimer {
        &self.reclaimer
    }

    /// Run one reclamation sweep on the calling thread
    pub fn sweep_now(&self) -> SweepReport {
        self.reclaimer.sweep_now()
    }

    /// Reclamation metrics
    pub fn stats(&self) -> ReclaimStats {
        self.reclaimer.stats()
    }

    /// Number of dropped resources not yet reclaimed
    pub fn pending_reclamation(&self) -> usize {
        self.graveyard.pending()
    }

    /// Stop the background reclaimer
    ///
    /// Dropped resources stay buried; `reclaimer().start()` or `sweep_now()`
    /// still frees them.
    pub fn shutdown(&self) {
        self.reclaimer.stop();
        info!(
            target: "reclaim::engine",
            pending = self.graveyard.pending(),
            "Engine shut down"
        );
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.reclaimer.stop();
        let report = self.graveyard.sweep();
        let forgotten = self.graveyard.clear();
        debug!(
            target: "reclaim::engine",
            reclaimed = report.reclaimed,
            forgotten,
            "Engine dropped"
        );
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("data_dir", &self.data_dir)
            .field("catalog", &self.catalog)
            .field("reclaimer", &self.reclaimer)
            .finish()
    }
}
