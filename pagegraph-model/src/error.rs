//! Error types for the model layer.

use pagegraph_client::GraphApiError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors surfaced by the model layer. The GraphQL layer maps these onto
/// its error codes (`NOT_FOUND`, `BAD_USER_INPUT`, ...), so the kinds here
/// are part of the contract.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A referenced entity, page, block or type does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied a malformed or contradictory request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation is deliberately stubbed out.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// An invariant the model relies on did not hold.
    #[error("internal error: {0}")]
    Internal(String),

    /// A graph service failure that does not map to a domain kind.
    #[error("graph API error: {0}")]
    Api(GraphApiError),
}

impl From<GraphApiError> for ModelError {
    fn from(err: GraphApiError) -> Self {
        match err {
            GraphApiError::EntityNotFound(entity_id) => {
                Self::NotFound(format!("entity {entity_id} not found"))
            }
            GraphApiError::LinkNotFound => Self::NotFound("link not found".to_owned()),
            GraphApiError::TypeNotFound(uri) => Self::NotFound(format!("type {uri} not found")),
            other => Self::Api(other),
        }
    }
}
