//! Error types for the component store
//!
//! Absence of a record is a normal outcome and is reported through `Option`,
//! never through this enum. We use `thiserror` for automatic `Display` and
//! `Error` trait implementations.

use crate::component::ComponentId;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the component store
#[derive(Debug, Error)]
pub enum Error {
    /// Another edit on the same id committed between this edit's read and
    /// its commit. The caller may retry the whole read-modify-write cycle.
    #[error("edit conflict on component {0}: a concurrent edit committed first")]
    EditConflict(ComponentId),

    /// The edit closure changed the immutable id field.
    #[error("component id is immutable: {expected} was changed to {actual}")]
    IdChanged {
        /// Id the record was read under
        expected: ComponentId,
        /// Id the closure left behind
        actual: ComponentId,
    },

    /// Backend connection or statement failure (durable backend only).
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Construct a storage error from any displayable cause
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// True for conflict errors, the one recoverable-by-retry case
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::EditConflict(_))
    }

    /// True for backend failures
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
