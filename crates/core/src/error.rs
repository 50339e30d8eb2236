//! Shared error taxonomy for graph rewriting and storage.

use thiserror::Error;

use crate::id::EntityId;

/// Result type used across the engine and storage layers.
pub type DepotResult<T> = Result<T, DepotError>;

/// Errors surfaced by graph rewriting and storage backends.
///
/// There is no local recovery anywhere in the workspace: every variant is a
/// hard stop for the current invocation, and callers decide what to do with
/// it (retry, map to a response, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DepotError {
    /// A resolution step referenced an entity that does not exist.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: EntityId },

    /// No lookup capability is registered for a type the traversal reached.
    #[error("no lookup registered for {kind}")]
    MissingLookup { kind: &'static str },

    /// The storage backend failed to apply a read or write.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// An asynchronous rewrite was cancelled mid-traversal.
    #[error("operation cancelled")]
    Cancelled,
}

impl DepotError {
    pub fn not_found(kind: &'static str, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn missing_lookup(kind: &'static str) -> Self {
        Self::MissingLookup { kind }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
