//! Background reclamation task
//!
//! This module provides Reclaimer, which runs in a background thread and
//! periodically sweeps the graveyard, freeing dropped resources whose
//! refcount has reached zero.
//!
//! # Design Notes
//!
//! - Releasing a handle never frees anything; all destruction work happens here
//! - The interval is advisory, not a correctness bound
//! - Graceful shutdown via atomic flag; `stop()` joins the thread
//! - Restartable: anything still buried after `stop()` is swept after `start()`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use reclaim_core::ReclaimResult;
use tracing::{info, warn};

use crate::graveyard::{Graveyard, ReclaimStats, SweepReport};

/// Longest uninterrupted sleep, so shutdown is noticed promptly
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// A running sweep thread and its private shutdown signal
struct Worker {
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Background reclamation task
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use reclaim_storage::{Graveyard, Reclaimer};
///
/// let graveyard = Arc::new(Graveyard::new());
/// let reclaimer = Reclaimer::new(Arc::clone(&graveyard), Duration::from_secs(1));
/// reclaimer.start()?;
///
/// // ... drop resources, release handles ...
///
/// reclaimer.stop();
/// ```
pub struct Reclaimer {
    /// Resources awaiting reclamation
    graveyard: Arc<Graveyard>,
    /// How often to sweep
    interval: Duration,
    /// Worker thread, present while running
    worker: Mutex<Option<Worker>>,
}

impl Reclaimer {
    /// Create a stopped reclaimer
    ///
    /// # Arguments
    ///
    /// * `graveyard` - Resources to sweep
    /// * `interval` - How often to sweep
    pub fn new(graveyard: Arc<Graveyard>, interval: Duration) -> Self {
        Self {
            graveyard,
            interval,
            worker: Mutex::new(None),
        }
    }

    /// Sweep interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the background sweep
    ///
    /// Does nothing if already running. Fails only if the worker thread
    /// cannot be spawned.
    pub fn start(&self) -> ReclaimResult<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Ok(());
        }

        let stop_signal = Arc::new(AtomicBool::new(false));
        let graveyard = Arc::clone(&self.graveyard);
        let shutdown = Arc::clone(&stop_signal);
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("reclaim-sweeper".to_string())
            .spawn(move || {
                while !shutdown.load(Ordering::Acquire) {
                    // Sleep first (don't sweep immediately on start)
                    let mut elapsed = Duration::ZERO;
                    while elapsed < interval {
                        if shutdown.load(Ordering::Acquire) {
                            return;
                        }
                        let nap = SHUTDOWN_POLL.min(interval - elapsed);
                        thread::sleep(nap);
                        elapsed += nap;
                    }

                    graveyard.sweep();
                }
            })?;

        *worker = Some(Worker {
            shutdown: stop_signal,
            handle,
        });
        info!(
            target: "reclaim::reclaimer",
            interval_ms = interval.as_millis() as u64,
            "Reclaimer started"
        );
        Ok(())
    }

    /// Signal shutdown and wait for the worker to exit
    ///
    /// Unswept resources stay buried and remain eligible once restarted.
    pub fn stop(&self) {
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            worker.shutdown.store(true, Ordering::Release);
            if worker.handle.join().is_err() {
                warn!(target: "reclaim::reclaimer", "Reclaimer thread panicked");
            }
            info!(
                target: "reclaim::reclaimer",
                pending = self.graveyard.pending(),
                "Reclaimer stopped"
            );
        }
    }

    /// Whether the background sweep is running
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Run one sweep on the calling thread
    pub fn sweep_now(&self) -> SweepReport {
        self.graveyard.sweep()
    }

    /// Metrics snapshot
    pub fn stats(&self) -> ReclaimStats {
        self.graveyard.stats()
    }
}

impl Drop for Reclaimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Reclaimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reclaimer")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}
