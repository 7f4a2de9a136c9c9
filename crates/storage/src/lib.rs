//! Reference-tracking storage layer for reclaimdb
//!
//! This crate implements the deferred-reclamation machinery shared by all
//! resource kinds:
//! - RefState: packed atomic word holding the refcount and lifecycle flags
//! - Resource: uniform state + refcount + payload wrapper
//! - Handle: scoped reference token, released on drop
//! - Graveyard: dropped resources awaiting reclamation
//! - Reclaimer: background sweep that frees unreferenced dropped resources
//!
//! # Lifetime rules
//!
//! A resource is freed only once it is `Dropped` and its refcount is zero.
//! Once dropped no new reference can be acquired, so the refcount of a
//! dropped resource only ever goes down and the sweep cannot race a reader.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod graveyard;
pub mod handle;
pub mod reclaimer;
pub mod refstate;
pub mod resource;

pub use graveyard::{Graveyard, ReclaimStats, SweepReport};
pub use handle::Handle;
pub use reclaimer::Reclaimer;
pub use refstate::{ReclaimAttempt, RefState};
pub use resource::{Payload, Reclaimable, Resource};
