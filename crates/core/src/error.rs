//! Error types for reclaimdb
//!
//! Three classes matter to callers:
//! - `NotFound` / `AlreadyExists`: recoverable, surfaced directly
//! - `InvariantViolation`: a defect (refcount underflow, reclaiming a
//!   referenced object); the operation is aborted and nothing is retried
//! - everything else (`InvalidName`, `Forbidden`, `Config`, `Io`): recoverable
//!   input or environment problems
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::names::NameError;
use crate::types::ResourceKind;
use std::io;
use thiserror::Error;

/// Result type alias for reclaimdb operations
pub type ReclaimResult<T> = std::result::Result<T, ReclaimError>;

/// Error types for reclaimdb
#[derive(Debug, Error)]
pub enum ReclaimError {
    /// Name or key absent from the catalog or the parent index
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Kind of resource that was looked up
        kind: ResourceKind,
        /// Name or key that was looked up
        name: String,
    },

    /// Create collided with a live resource of the same name
    #[error("{kind} already exists: {name}")]
    AlreadyExists {
        /// Kind of resource that collided
        kind: ResourceKind,
        /// Colliding name or key
        name: String,
    },

    /// Internal reference-tracking invariant broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Name or key failed validation
    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        /// Kind of resource being named
        kind: ResourceKind,
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: NameError,
    },

    /// Operation not permitted in the current context
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (config file, worker thread spawn)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReclaimError {
    /// Build a `NotFound` error
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        ReclaimError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Build an `AlreadyExists` error
    pub fn already_exists(kind: ResourceKind, name: impl Into<String>) -> Self {
        ReclaimError::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Build an `InvariantViolation` error
    pub fn invariant(message: impl Into<String>) -> Self {
        ReclaimError::InvariantViolation(message.into())
    }

    /// Build an `InvalidName` error
    pub fn invalid_name(kind: ResourceKind, name: impl Into<String>, reason: NameError) -> Self {
        ReclaimError::InvalidName {
            kind,
            name: name.into(),
            reason,
        }
    }

    /// Build a `Forbidden` error
    pub fn forbidden(message: impl Into<String>) -> Self {
        ReclaimError::Forbidden(message.into())
    }

    /// Build a `Config` error
    pub fn config(message: impl Into<String>) -> Self {
        ReclaimError::Config(message.into())
    }

    /// Returns true for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReclaimError::NotFound { .. })
    }

    /// Returns true for `AlreadyExists`
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ReclaimError::AlreadyExists { .. })
    }

    /// Returns true for `InvariantViolation`
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, ReclaimError::InvariantViolation(_))
    }

    /// Whether a caller can reasonably handle this error
    ///
    /// Invariant violations are defects and never recoverable.
    pub fn is_recoverable(&self) -> bool {
        !self.is_invariant_violation()
    }
}
