//! Lifecycle Integration Tests
//!
//! Logical deletion of databases while handles into them are still held,
//! and eventual reclamation once those handles go away.

#[path = "../common/mod.rs"]
mod common;

mod documents;
mod reclamation;
mod sessions;
