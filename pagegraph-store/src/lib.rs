//! Client-side entity store.
//!
//! The client edits a page locally and syncs in batches, so it holds two
//! views of every entity: the last server-confirmed state and a draft
//! overlay keyed by locally generated draft ids. Reconciliation merges a
//! freshly fetched content tree into the overlay without discarding local
//! edits. Pure and synchronous; no graph service involved.

mod draft;
mod error;
mod store;

pub use draft::{DraftEntity, DraftId, SavedEntity};
pub use error::{StoreError, StoreResult};
pub use store::{EntityStore, create_entity_store};
