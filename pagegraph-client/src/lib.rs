//! Graph service boundary for pagegraph.
//!
//! The versioned entity graph lives in a remote service; this crate defines
//! what the core consumes from it:
//! - the wire shapes (`{metadata, inner}` entity envelopes, link records,
//!   structural queries and subgraphs)
//! - the [`GraphApi`] async trait every backend implements
//! - [`InMemoryGraph`], a reference backend driving the workspace's tests
//!   and local development
//!
//! Nothing here is transactional: every call is an independent remote
//! operation and partial failure across calls leaves earlier writes in
//! place.

mod api;
mod error;
mod memory;
mod wire;

pub use api::{CreateEntityParams, CreateLinkParams, GraphApi, RemoveLinkParams, UpdateEntityParams};
pub use error::{ClientResult, GraphApiError};
pub use memory::InMemoryGraph;
pub use wire::{
    EntityMetadata, EntityTypeSchema, Filter, LinkRecord, LinkTypeSchema, PersistedEntity,
    ResolveDepths, Subgraph,
};
