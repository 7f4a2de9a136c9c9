//! Name validation
//!
//! ## Rules
//!
//! | Kind | Length | Characters | First character |
//! |------|--------|------------|-----------------|
//! | Database | 1-64 | `[A-Za-z0-9_-]` | letter |
//! | Collection | 1-256 | `[A-Za-z0-9_-]` | letter or `_` |
//! | Document key | 1-254 | `[A-Za-z0-9_:.@()+,=;$!*'%-]` | any allowed |
//!
//! The system database (`_system` by default) is created by the engine
//! itself and bypasses the database rule.

use std::fmt;

/// Default name of the undroppable system database
pub const DEFAULT_SYSTEM_DATABASE: &str = "_system";

/// Maximum length of a database name
pub const MAX_DATABASE_NAME_LENGTH: usize = 64;

/// Maximum length of a collection name
pub const MAX_COLLECTION_NAME_LENGTH: usize = 256;

/// Maximum length of a document key
pub const MAX_DOCUMENT_KEY_LENGTH: usize = 254;

/// Error when validating a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty
    Empty,
    /// Name exceeds maximum length
    TooLong {
        /// Actual length of the name
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Name contains invalid character
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position of the invalid character
        position: usize,
    },
    /// Name starts with invalid character
    InvalidStart {
        /// The invalid starting character
        char: char,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "name cannot be empty"),
            NameError::TooLong { length, max } => {
                write!(f, "name too long: {} chars (max {})", length, max)
            }
            NameError::InvalidChar { char, position } => {
                write!(f, "invalid character '{}' at position {}", char, position)
            }
            NameError::InvalidStart { char } => {
                write!(f, "name cannot start with '{}'", char)
            }
        }
    }
}

impl std::error::Error for NameError {}

fn validate(
    name: &str,
    max: usize,
    valid_start: impl Fn(char) -> bool,
    valid_char: impl Fn(char) -> bool,
) -> Result<(), NameError> {
    let first = match name.chars().next() {
        Some(c) => c,
        None => return Err(NameError::Empty),
    };

    let length = name.chars().count();
    if length > max {
        return Err(NameError::TooLong { length, max });
    }

    if !valid_start(first) {
        return Err(NameError::InvalidStart { char: first });
    }

    for (position, ch) in name.chars().enumerate() {
        if !valid_char(ch) {
            return Err(NameError::InvalidChar { char: ch, position });
        }
    }

    Ok(())
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

#[inline]
fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_-:.@()+,=;$!*'%".contains(c)
}

/// Validate a user-supplied database name
pub fn validate_database_name(name: &str) -> Result<(), NameError> {
    validate(
        name,
        MAX_DATABASE_NAME_LENGTH,
        |c| c.is_ascii_alphabetic(),
        is_name_char,
    )
}

/// Validate a collection name
///
/// A leading underscore is allowed (system collections).
pub fn validate_collection_name(name: &str) -> Result<(), NameError> {
    validate(
        name,
        MAX_COLLECTION_NAME_LENGTH,
        |c| c.is_ascii_alphabetic() || c == '_',
        is_name_char,
    )
}

/// Validate a document key
pub fn validate_document_key(key: &str) -> Result<(), NameError> {
    validate(key, MAX_DOCUMENT_KEY_LENGTH, is_key_char, is_key_char)
}
