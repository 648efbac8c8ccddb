//! Error types for the action layer.

use pagegraph_model::ModelError;
use pagegraph_types::PlaceholderId;
use thiserror::Error;

/// Errors from applying one action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A placeholder was referenced before any earlier action registered it.
    #[error("placeholder {0} has not been registered by an earlier action")]
    MissingPlaceholder(PlaceholderId),

    /// The underlying model operation failed.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors from executing a batch. Action failures carry the position of
/// the failing action so callers can point at it.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Loading or reloading the target page failed.
    #[error(transparent)]
    Page(#[from] ModelError),

    /// An action failed; earlier actions stay persisted.
    #[error("action {index}: {source}")]
    Action {
        index: usize,
        source: ActionError,
    },
}
