//! Dropped resources awaiting reclamation
//!
//! The drop coordinator buries every resource it flags; each sweep tries to
//! reclaim everything buried and keeps whatever is still referenced for the
//! next pass. Sweeps never return errors: a skipped resource is simply
//! retried later.

use crate::refstate::ReclaimAttempt;
use crate::resource::Reclaimable;
use parking_lot::Mutex;
use reclaim_core::{ReclaimError, ReclaimResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Outcome of a single sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Resources freed by this sweep
    pub reclaimed: usize,
    /// Resources skipped because they are still referenced
    pub skipped: usize,
}

/// Reclamation metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclaimStats {
    /// Sweeps run since creation
    pub sweeps: u64,
    /// Resources reclaimed since creation
    pub reclaimed: u64,
    /// Skips due to outstanding references since creation
    pub skipped: u64,
    /// Resources currently awaiting reclamation
    pub pending: usize,
}

/// Buried entries plus those a running sweep has taken out
#[derive(Default)]
struct Pending {
    entries: Vec<Arc<dyn Reclaimable>>,
    in_flight: usize,
}

impl Pending {
    fn len(&self) -> usize {
        self.entries.len() + self.in_flight
    }
}

/// Set of dropped, not yet reclaimed resources
///
/// Entries taken by a sweep stay counted as pending until the sweep hands
/// back what it could not reclaim.
///
/// The metric counters use Relaxed ordering: they are observational only and
/// synchronize nothing.
#[derive(Default)]
pub struct Graveyard {
    pending: Mutex<Pending>,
    total_sweeps: AtomicU64,
    total_reclaimed: AtomicU64,
    total_skipped: AtomicU64,
}

impl Graveyard {
    /// Create an empty graveyard
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a dropped resource for reclamation
    ///
    /// Burying a live resource is an invariant violation.
    pub fn bury(&self, resource: Arc<dyn Reclaimable>) -> ReclaimResult<()> {
        if resource.state().is_live() {
            return Err(ReclaimError::invariant(format!(
                "cannot bury live {} '{}'",
                resource.kind(),
                resource.label()
            )));
        }
        self.pending.lock().entries.push(resource);
        Ok(())
    }

    /// Number of resources awaiting reclamation, including any a running
    /// sweep is still deciding on
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether nothing awaits reclamation
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Try to reclaim every buried resource once
    ///
    /// Reclamation runs outside the lock so that concurrent drops can keep
    /// burying while a sweep is in progress.
    pub fn sweep(&self) -> SweepReport {
        let candidates = {
            let mut pending = self.pending.lock();
            let taken = std::mem::take(&mut pending.entries);
            pending.in_flight += taken.len();
            taken
        };
        let taken = candidates.len();
        let mut report = SweepReport::default();
        let mut retained = Vec::new();

        for resource in candidates {
            match resource.try_reclaim() {
                ReclaimAttempt::Reclaimed => {
                    report.reclaimed += 1;
                    info!(
                        target: "reclaim::reclaimer",
                        kind = %resource.kind(),
                        name = %resource.label(),
                        id = %resource.id(),
                        "Resource reclaimed"
                    );
                }
                ReclaimAttempt::Referenced(refcount) => {
                    report.skipped += 1;
                    debug!(
                        target: "reclaim::reclaimer",
                        kind = %resource.kind(),
                        name = %resource.label(),
                        refcount,
                        "Resource still referenced, retrying next sweep"
                    );
                    retained.push(resource);
                }
                ReclaimAttempt::AlreadyReclaimed => {}
                ReclaimAttempt::NotDropped => {
                    error!(
                        target: "reclaim::reclaimer",
                        kind = %resource.kind(),
                        name = %resource.label(),
                        "Live resource found in graveyard, discarding entry"
                    );
                }
            }
        }

        self.total_sweeps.fetch_add(1, Ordering::Relaxed);
        self.total_reclaimed
            .fetch_add(report.reclaimed as u64, Ordering::Relaxed);
        self.total_skipped
            .fetch_add(report.skipped as u64, Ordering::Relaxed);

        // totals first, so a reader that sees nothing pending sees them too
        {
            let mut pending = self.pending.lock();
            pending.entries.extend(retained);
            pending.in_flight -= taken;
        }

        debug!(
            target: "reclaim::reclaimer",
            reclaimed = report.reclaimed,
            skipped = report.skipped,
            "Sweep complete"
        );
        report
    }

    /// Forget every pending resource without reclaiming it
    ///
    /// Used at teardown. Payloads hold the coordinator, which holds this
    /// graveyard, so entries left behind would otherwise never be freed.
    /// Forgotten resources still referenced by handles are freed with their
    /// last handle. Returns how many entries were forgotten.
    pub fn clear(&self) -> usize {
        let forgotten = std::mem::take(&mut self.pending.lock().entries);
        forgotten.len()
    }

    /// Metrics snapshot
    pub fn stats(&self) -> ReclaimStats {
        ReclaimStats {
            sweeps: self.total_sweeps.load(Ordering::Relaxed),
            reclaimed: self.total_reclaimed.load(Ordering::Relaxed),
            skipped: self.total_skipped.load(Ordering::Relaxed),
            pending: self.pending(),
        }
    }
}

impl std::fmt::Debug for Graveyard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graveyard")
            .field("pending", &self.pending())
            .field("sweeps", &self.total_sweeps.load(Ordering::Relaxed))
            .finish()
    }
}
