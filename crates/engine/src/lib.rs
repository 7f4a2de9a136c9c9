//! Database engine for reclaimdb
//!
//! This crate ties the storage layer into a usable engine:
//! - Catalog: live database names, linearized behind one lock
//! - DropCoordinator: logical deletion and `Dropped` propagation
//! - Primitives: database, collection and document payloads
//! - Session: per-caller active-database context
//! - Engine: the facade owning catalog, graveyard and reclaimer
//!
//! Dropping never waits for outstanding handles. Physical reclamation is
//! left to the background reclaimer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod primitives;
pub mod session;

pub use catalog::Catalog;
pub use config::{EngineConfig, CONFIG_FILE_NAME, DEFAULT_RECLAIM_INTERVAL_MS};
pub use coordinator::DropCoordinator;
pub use engine::Engine;
pub use primitives::{
    CollectionData, CollectionHandle, DatabaseData, DatabaseHandle, DocumentData, DocumentHandle,
    DocumentMeta,
};
pub use session::Session;

// Re-export the lower layers so callers need a single dependency
pub use reclaim_core::{NameError, ReclaimError, ReclaimResult, ResourceId, ResourceKind, ResourceState};
pub use reclaim_storage::{Handle, ReclaimStats, Reclaimer, SweepReport};
