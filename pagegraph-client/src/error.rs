//! Error types for the graph client boundary.

use pagegraph_types::{EntityId, VersionedUri};
use thiserror::Error;

/// Result type for graph client operations.
pub type ClientResult<T> = Result<T, GraphApiError>;

/// Errors returned by a graph backend.
#[derive(Debug, Error)]
pub enum GraphApiError {
    /// No live entity with this id.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// No live link matching the given source, target and type.
    #[error("link not found")]
    LinkNotFound,

    /// The referenced entity or link type is not known to the service.
    #[error("type {0} not found")]
    TypeNotFound(VersionedUri),

    /// The write conflicts with existing state (e.g. creating an entity
    /// under an id that is already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transport-level failure talking to the service.
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
