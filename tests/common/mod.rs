//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Once};
use std::thread;
use std::time::{Duration, Instant};

pub use reclaimdb::{
    CollectionHandle, DatabaseHandle, DocumentHandle, Engine, EngineConfig, ReclaimError,
    ResourceKind, ResourceState, Session,
};
pub use serde_json::json;

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Install an env-filtered fmt subscriber once per test binary.
///
/// Set `RUST_LOG=reclaim=debug` to see catalog, drop and sweep events.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Sweep interval used by engines with a running reclaimer.
pub const FAST_INTERVAL_MS: u64 = 20;

/// Engine whose reclaimer sweeps every [`FAST_INTERVAL_MS`].
pub fn fast_engine() -> Arc<Engine> {
    init_tracing();
    Engine::with_config(EngineConfig {
        reclaim_interval_ms: FAST_INTERVAL_MS,
        ..EngineConfig::default()
    })
    .unwrap()
}

/// Engine with the reclaimer stopped; tests drive sweeps with `sweep_now`.
pub fn manual_engine() -> Arc<Engine> {
    init_tracing();
    Engine::with_config(EngineConfig {
        start_reclaimer: false,
        ..EngineConfig::default()
    })
    .unwrap()
}

// ============================================================================
// Helpers
// ============================================================================

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique database name for this test binary.
pub fn unique_name(prefix: &str) -> String {
    format!("{}{}", prefix, COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// Sleep for a few sweep intervals of a [`fast_engine`].
pub fn let_reclaimer_run() {
    thread::sleep(Duration::from_millis(FAST_INTERVAL_MS * 5));
}

/// Create `db.name` with collection `c` holding `test0..test{n-1}` where
/// `value` equals the index.
pub fn populate(engine: &Engine, db: &str, n: usize) -> (DatabaseHandle, CollectionHandle) {
    let db = engine.create_database(db).unwrap();
    let c = engine.create_collection(&db, "c").unwrap();
    for i in 0..n {
        c.save(&format!("test{}", i), json!({ "value": i })).unwrap();
    }
    (db, c)
}
