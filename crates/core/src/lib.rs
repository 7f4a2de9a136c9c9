//! Core types for reclaimdb
//!
//! This crate defines the foundational types shared by every layer:
//! - ResourceId: Stable identity of a database, collection or document
//! - ResourceKind: Discriminates the three resource kinds
//! - ResourceState: Logical state (`Live` / `Dropped`)
//! - ReclaimError: Error taxonomy (NotFound, AlreadyExists, InvariantViolation, ...)
//! - Name validation for databases, collections and document keys

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod names;
pub mod types;

pub use error::{ReclaimError, ReclaimResult};
pub use names::{
    validate_collection_name, validate_database_name, validate_document_key, NameError,
    DEFAULT_SYSTEM_DATABASE, MAX_COLLECTION_NAME_LENGTH, MAX_DATABASE_NAME_LENGTH,
    MAX_DOCUMENT_KEY_LENGTH,
};
pub use types::{ResourceId, ResourceKind, ResourceState};
