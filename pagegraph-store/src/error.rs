//! Error types for store reconciliation.

use crate::draft::DraftId;
use pagegraph_types::EntityId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from reconciling a store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A preset assignment referenced a draft row that does not exist.
    #[error("no draft row for preset draft id {0}")]
    MissingDraft(DraftId),

    /// A preset assignment targeted a draft row that already carries a
    /// different entity id. Entity ids are write-once per draft row.
    #[error("draft {draft_id} already carries entity id {existing}, cannot assign {assigned}")]
    EntityIdConflict {
        draft_id: DraftId,
        existing: EntityId,
        assigned: EntityId,
    },
}
