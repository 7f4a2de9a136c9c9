//! reclaimdb - Embedded document store with deferred reclamation
//!
//! Dropping a database removes it from enumeration and lookup at once, while
//! handles opened before the drop keep returning the same data until they
//! are released. A background reclaimer frees dropped databases, collections
//! and documents once nothing references them.
//!
//! # Quick Start
//!
//! ```ignore
//! use reclaimdb::Engine;
//! use serde_json::json;
//!
//! let engine = Engine::ephemeral()?;
//! let db = engine.create_database("X")?;
//! let c = engine.create_collection(&db, "c")?;
//! c.save("test0", json!({"value": 0}))?;
//! let doc = c.document("test0")?;
//!
//! engine.drop_database("X")?;
//! assert!(!engine.list_databases().contains(&"X".to_string()));
//! assert_eq!(doc.get("value"), Some(&json!(0)));
//! ```
//!
//! # Architecture
//!
//! Everything public lives in `reclaim-engine`; the reference-tracking layer
//! (`reclaim-storage`) and the shared types (`reclaim-core`) are re-exported
//! through it.

// Re-export the public API from reclaim-engine
pub use reclaim_engine::*;
