//! Core type definitions for pagegraph.
//!
//! This crate defines the fundamental types shared by the model layer, the
//! graph client boundary and the client-side entity store:
//! - Entity and account identifiers (UUID v7)
//! - Versioned type URIs for entity and link types
//! - Hybrid version timestamps (wall time + logical counter)
//! - Placeholder-aware identifiers for batched mutations
//! - Entity property maps keyed by property-type base URI
//! - Fractional ordering keys for sibling ordering
//!
//! Everything here is plain data; remote operations live in the client and
//! model crates.

mod fractional;
mod identifier;
mod ids;
mod properties;
mod uri;
mod version;

pub use fractional::key_between;
pub use identifier::{Identifier, MaybePlaceholder, PlaceholderId, TypeIdentifier};
pub use ids::{AccountId, EntityId};
pub use properties::Properties;
pub use uri::{BaseUri, VersionedUri};
pub use version::EntityVersion;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid versioned URI: {0}")]
    InvalidUri(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("invalid ordering key: {0}")]
    InvalidOrderingKey(String),
}
