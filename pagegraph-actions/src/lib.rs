//! Batched page updates.
//!
//! A client edits a page as one batch of [`UpdatePageAction`]s: create
//! entities, insert blocks, swap block data, reorder. Actions run strictly
//! in order, and later actions can reference entities created by earlier
//! ones through placeholder ids. Execution is not transactional; a failure
//! reports the index of the failing action and leaves earlier effects
//! persisted.

mod actions;
mod error;
mod placeholder;
mod processor;

pub use actions::{
    CreateEntityAction, InsertBlockAction, MoveBlockAction, RemoveBlockAction,
    SwapBlockDataAction, UpdateEntityAction, UpdatePageAction,
};
pub use error::{ActionError, BatchError};
pub use placeholder::{PlaceholderPayload, PlaceholderResultsMap};
pub use processor::{BatchOutcome, UpdatePageBatch};
