//! Error types for store operations.
//!
//! The guard introduces no failures of its own: everything here is raised
//! by the host's store or transport and passes through the guard unchanged
//! to the host framework's navigation-failure handling.

use crate::key::{RecordId, TypeName};
use thiserror::Error;

/// Store-side errors surfaced by fetch and reload operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {type_name} with id {id}")]
    NotFound { type_name: TypeName, id: RecordId },

    #[error("Cannot reload a record that was never persisted")]
    NeverPersisted,

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
