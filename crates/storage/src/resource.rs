//! Resource objects
//!
//! `Resource<T>` is the uniform wrapper shared by databases, collections and
//! documents: a stable id, a packed [`RefState`] and an immutable payload.
//! Kind-specific behavior lives in the [`Payload`] implementation; the
//! reclamation machinery only ever sees the object-safe [`Reclaimable`] view.

use crate::refstate::{ReclaimAttempt, RefState};
use reclaim_core::{ReclaimError, ReclaimResult, ResourceId, ResourceKind, ResourceState};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Kind-specific contents of a resource
pub trait Payload: Send + Sync + 'static {
    /// Which kind of resource this payload belongs to
    const KIND: ResourceKind;

    /// Name (databases, collections) or key (documents)
    fn name(&self) -> &str;

    /// Resources reachable through this payload's children index
    ///
    /// Called by the drop coordinator after this resource has been flagged,
    /// so the children set can no longer grow.
    fn children(&self) -> Vec<Arc<dyn Reclaimable>> {
        Vec::new()
    }

    /// Release backing storage. Called exactly once, after reclamation.
    fn purge(&self) {}
}

/// Object-safe view of a resource used by the drop coordinator and the sweep
pub trait Reclaimable: Send + Sync {
    /// Stable identity
    fn id(&self) -> ResourceId;

    /// Resource kind
    fn kind(&self) -> ResourceKind;

    /// Name or key, for logging
    fn label(&self) -> String;

    /// Logical state
    fn state(&self) -> ResourceState;

    /// Outstanding references
    fn refcount(&self) -> u64;

    /// Whether the sweep already freed this resource
    fn is_reclaimed(&self) -> bool;

    /// Flag as dropped; true only for the transitioning call
    fn mark_dropped(&self) -> bool;

    /// Children to flag along with this resource
    fn children(&self) -> Vec<Arc<dyn Reclaimable>>;

    /// Free the resource if it is dropped and unreferenced
    fn try_reclaim(&self) -> ReclaimAttempt;
}

/// A reference-counted resource object
#[derive(Debug)]
pub struct Resource<T: Payload> {
    id: ResourceId,
    refs: RefState,
    payload: T,
}

impl<T: Payload> Resource<T> {
    /// Allocate a live resource carrying `initial_refs` references
    ///
    /// Databases start at one (the catalog's own reference); collections and
    /// documents start at zero because index membership is not counted.
    pub fn new(payload: T, initial_refs: u64) -> Arc<Self> {
        Arc::new(Resource {
            id: ResourceId::new(),
            refs: RefState::new(initial_refs),
            payload,
        })
    }

    /// Allocate a resource whose payload keeps a weak pointer to itself
    pub fn new_cyclic(initial_refs: u64, build: impl FnOnce(&Weak<Self>) -> T) -> Arc<Self> {
        Arc::new_cyclic(|this| Resource {
            id: ResourceId::new(),
            refs: RefState::new(initial_refs),
            payload: build(this),
        })
    }

    /// Stable identity
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Resource kind
    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }

    /// Payload; readable regardless of state
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Logical state
    pub fn state(&self) -> ResourceState {
        self.refs.state()
    }

    /// Whether the resource has been dropped
    pub fn is_dropped(&self) -> bool {
        self.refs.is_dropped()
    }

    /// Whether the sweep already freed this resource
    pub fn is_reclaimed(&self) -> bool {
        self.refs.is_reclaimed()
    }

    /// Outstanding references
    pub fn refcount(&self) -> u64 {
        self.refs.count()
    }

    /// Flag as dropped; true only for the transitioning call
    pub fn mark_dropped(&self) -> bool {
        let transitioned = self.refs.mark_dropped();
        if transitioned {
            debug!(
                target: "reclaim::drop",
                kind = %T::KIND,
                name = self.payload.name(),
                id = %self.id,
                refcount = self.refs.count(),
                "Resource flagged dropped"
            );
        }
        transitioned
    }

    pub(crate) fn try_acquire(&self) -> bool {
        self.refs.try_acquire()
    }

    /// Give back one reference
    ///
    /// Releasing more references than were taken is an
    /// [`ReclaimError::InvariantViolation`]; the count is left unchanged.
    pub fn release_ref(&self) -> ReclaimResult<u64> {
        self.refs.release().ok_or_else(|| {
            ReclaimError::invariant(format!(
                "refcount underflow releasing {} '{}' ({})",
                T::KIND,
                self.payload.name(),
                self.id
            ))
        })
    }
}

impl<T: Payload> Reclaimable for Resource<T> {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn kind(&self) -> ResourceKind {
        T::KIND
    }

    fn label(&self) -> String {
        self.payload.name().to_string()
    }

    fn state(&self) -> ResourceState {
        Resource::state(self)
    }

    fn refcount(&self) -> u64 {
        Resource::refcount(self)
    }

    fn is_reclaimed(&self) -> bool {
        Resource::is_reclaimed(self)
    }

    fn mark_dropped(&self) -> bool {
        Resource::mark_dropped(self)
    }

    fn children(&self) -> Vec<Arc<dyn Reclaimable>> {
        self.payload.children()
    }

    fn try_reclaim(&self) -> ReclaimAttempt {
        let attempt = self.refs.try_reclaim();
        if attempt == ReclaimAttempt::Reclaimed {
            self.payload.purge();
        }
        attempt
    }
}
