//! Concurrency Integration Tests
//!
//! Create/drop/list linearizability, handle traffic racing drops and sweeps,
//! and refcount accounting under contention.

#[path = "../common/mod.rs"]
mod common;

mod catalog_races;
