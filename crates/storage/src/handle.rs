//! Reference tokens
//!
//! A [`Handle`] is the only way callers reach a resource. Creating one takes a
//! reference, dropping it gives the reference back, so every exit path
//! (return, `?`, panic unwind) releases exactly once. `release()` does the
//! same explicitly and reports invariant violations instead of logging them.

use crate::resource::{Payload, Resource};
use reclaim_core::{ReclaimResult, ResourceId, ResourceKind, ResourceState};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::error;

/// Scoped reference to a resource
///
/// Dereferences to the payload. Reads never fail because of a concurrent drop:
/// the payload stays intact for as long as any handle exists.
pub struct Handle<T: Payload> {
    resource: Arc<Resource<T>>,
    released: bool,
}

impl<T: Payload> Handle<T> {
    /// Take a new reference on a live resource
    ///
    /// Returns `None` once the resource has been dropped: no reference can be
    /// manufactured after that point.
    pub fn acquire(resource: &Arc<Resource<T>>) -> Option<Self> {
        if resource.try_acquire() {
            Some(Handle {
                resource: Arc::clone(resource),
                released: false,
            })
        } else {
            None
        }
    }

    /// Stable identity of the referenced resource
    pub fn id(&self) -> ResourceId {
        self.resource.id()
    }

    /// Kind of the referenced resource
    pub fn kind(&self) -> ResourceKind {
        T::KIND
    }

    /// Name or key of the referenced resource
    pub fn name(&self) -> &str {
        self.resource.payload().name()
    }

    /// Logical state of the referenced resource
    pub fn state(&self) -> ResourceState {
        self.resource.state()
    }

    /// Whether the referenced resource has been dropped
    pub fn is_dropped(&self) -> bool {
        self.resource.is_dropped()
    }

    /// Outstanding references on the resource, this one included
    pub fn refcount(&self) -> u64 {
        self.resource.refcount()
    }

    /// The payload
    pub fn payload(&self) -> &T {
        self.resource.payload()
    }

    /// The underlying resource
    pub fn resource(&self) -> &Arc<Resource<T>> {
        &self.resource
    }

    /// Release this reference
    pub fn release(mut self) -> ReclaimResult<()> {
        self.released = true;
        self.resource.release_ref().map(|_| ())
    }
}

impl<T: Payload> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.resource.payload()
    }
}

impl<T: Payload> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.resource.release_ref() {
            error!(target: "reclaim::handle", error = %e, "Implicit handle release failed");
        }
    }
}

impl<T: Payload> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &T::KIND)
            .field("name", &self.name())
            .field("id", &self.id())
            .field("state", &self.state())
            .field("refcount", &self.refcount())
            .finish()
    }
}
