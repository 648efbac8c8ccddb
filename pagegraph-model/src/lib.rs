//! Domain models over the versioned entity graph.
//!
//! One value type per concept — [`Entity`], [`Link`], [`Block`], [`Page`] —
//! composed rather than inherited: a block or page holds an [`Entity`] and
//! adds the operations its type tag permits. Every operation takes the
//! graph backend as an explicit `&dyn GraphApi` and the acting account as
//! an explicit parameter.
//!
//! Multi-entity operations ([`create_entity_with_links`]) are not
//! transactional: a failure partway through leaves the already-created
//! entities persisted.

mod block;
mod entity;
mod error;
mod link;
mod page;
pub mod system;
mod tree;

pub use block::Block;
pub use entity::{CreateEntity, Entity, PropertyPatch, TypeCache};
pub use error::{ModelError, ModelResult};
pub use link::{CreateLink, Link};
pub use page::Page;
pub use tree::{
    EntityDefinition, ExistingEntity, LinkedEntityDefinition, create_entity_with_links,
};
