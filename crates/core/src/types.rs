//! Identity and lifecycle types
//!
//! - ResourceId: UUID-backed identity, unique within a resource kind
//! - ResourceKind: Database / Collection / Document
//! - ResourceState: Live / Dropped (monotonic)

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a resource object
///
/// A ResourceId wraps a UUID v4. Identities never change over the life of a
/// resource and are never reused, so a dropped database and a later database
/// created under the same name are always distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Create a new random ResourceId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three kinds of resource objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A logical database, owned by the catalog
    Database,
    /// A named collection inside a database
    Collection,
    /// One immutable document revision inside a collection
    Document,
}

impl ResourceKind {
    /// Lowercase name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Database => "database",
            ResourceKind::Collection => "collection",
            ResourceKind::Document => "document",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical state of a resource
///
/// Transitions are one-way: `Live -> Dropped`. A dropped resource is never
/// reachable by name again but stays readable through handles issued before
/// the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResourceState {
    /// Reachable through its owner's index
    #[default]
    Live,
    /// Logically deleted; awaiting reclamation
    Dropped,
}

impl ResourceState {
    /// Returns true for `Live`
    pub fn is_live(&self) -> bool {
        matches!(self, ResourceState::Live)
    }

    /// Returns true for `Dropped`
    pub fn is_dropped(&self) -> bool {
        matches!(self, ResourceState::Dropped)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceState::Live => f.write_str("live"),
            ResourceState::Dropped => f.write_str("dropped"),
        }
    }
}
