//! Packed reference state
//!
//! The refcount and both lifecycle flags live in a single `AtomicU64` so that
//! acquire, release, drop and reclaim are each one atomic read-modify-write:
//!
//! ```text
//! bit 63        DROPPED    set once, never cleared
//! bit 62        RECLAIMED  set once by the sweep, never cleared
//! bits 0..=61   refcount
//! ```
//!
//! Acquire refuses once DROPPED is set, and reclaim only succeeds on the exact
//! word `DROPPED | 0`. Together these make the post-drop refcount
//! monotonically non-increasing, which is what lets the sweep free without
//! a lock.

use reclaim_core::ResourceState;
use std::sync::atomic::{AtomicU64, Ordering};

const DROPPED: u64 = 1 << 63;
const RECLAIMED: u64 = 1 << 62;
const COUNT_MASK: u64 = RECLAIMED - 1;

/// Result of a reclamation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimAttempt {
    /// The resource transitioned to reclaimed
    Reclaimed,
    /// Still referenced; retry on a later sweep
    Referenced(u64),
    /// Another sweep already reclaimed it
    AlreadyReclaimed,
    /// The resource was never dropped
    NotDropped,
}

/// Atomic refcount with `Dropped` / reclaimed flags
#[derive(Debug)]
pub struct RefState(AtomicU64);

impl RefState {
    /// Create a live state with `initial` outstanding references
    pub fn new(initial: u64) -> Self {
        assert!(initial <= COUNT_MASK, "initial refcount out of range");
        RefState(AtomicU64::new(initial))
    }

    #[inline]
    fn load(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Current refcount
    pub fn count(&self) -> u64 {
        self.load() & COUNT_MASK
    }

    /// Logical state derived from the DROPPED flag
    pub fn state(&self) -> ResourceState {
        if self.is_dropped() {
            ResourceState::Dropped
        } else {
            ResourceState::Live
        }
    }

    /// Whether the DROPPED flag is set
    pub fn is_dropped(&self) -> bool {
        self.load() & DROPPED != 0
    }

    /// Whether the sweep has reclaimed this resource
    pub fn is_reclaimed(&self) -> bool {
        self.load() & RECLAIMED != 0
    }

    /// Take one reference if the resource is still live
    ///
    /// Returns false once the resource is dropped.
    pub fn try_acquire(&self) -> bool {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                if word & (DROPPED | RECLAIMED) != 0 {
                    return None;
                }
                assert!(word & COUNT_MASK < COUNT_MASK, "refcount overflow");
                Some(word + 1)
            })
            .is_ok()
    }

    /// Give back one reference
    ///
    /// Returns the remaining count, or `None` if the count was already zero
    /// (the word is left untouched in that case).
    pub fn release(&self) -> Option<u64> {
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |word| {
                if word & COUNT_MASK == 0 {
                    None
                } else {
                    Some(word - 1)
                }
            })
            .ok()
            .map(|previous| (previous & COUNT_MASK) - 1)
    }

    /// Set the DROPPED flag
    ///
    /// Returns true only for the call that performed the transition.
    pub fn mark_dropped(&self) -> bool {
        self.0.fetch_or(DROPPED, Ordering::AcqRel) & DROPPED == 0
    }

    /// Transition `DROPPED | 0` to reclaimed
    pub fn try_reclaim(&self) -> ReclaimAttempt {
        match self.0.compare_exchange(
            DROPPED,
            DROPPED | RECLAIMED,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => ReclaimAttempt::Reclaimed,
            Err(word) if word & DROPPED == 0 => ReclaimAttempt::NotDropped,
            Err(word) if word & RECLAIMED != 0 => ReclaimAttempt::AlreadyReclaimed,
            Err(word) => ReclaimAttempt::Referenced(word & COUNT_MASK),
        }
    }
}
