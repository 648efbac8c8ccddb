//! Wire shapes exchanged with the graph service.

use pagegraph_types::{AccountId, EntityId, EntityVersion, Properties, VersionedUri};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata of one entity version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub owned_by_id: AccountId,
    pub entity_id: EntityId,
    pub version: EntityVersion,
    pub entity_type_id: VersionedUri,
    pub created_by_id: AccountId,
    pub updated_by_id: AccountId,
    /// Set when the entity has been logically removed; removal never
    /// deletes the version history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_by_id: Option<AccountId>,
}

/// The `{metadata, inner}` envelope the service returns for entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntity {
    pub metadata: EntityMetadata,
    pub inner: Properties,
}

/// A typed, ordered, directed edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub link_type_id: VersionedUri,
    /// Ordering among sibling links of the same type from the same source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    pub owned_by_id: AccountId,
    pub created_by_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_by_id: Option<AccountId>,
}

/// An entity type as referenced by entities. Referenced, never owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeSchema {
    pub entity_type_id: VersionedUri,
    pub title: String,
}

/// A link type as referenced by links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTypeSchema {
    pub link_type_id: VersionedUri,
    pub title: String,
}

/// How far the service should resolve each edge kind when answering a
/// structural query. Zero everywhere means "roots only".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveDepths {
    pub data_type_resolve_depth: u8,
    pub property_type_resolve_depth: u8,
    pub link_type_resolve_depth: u8,
    pub entity_type_resolve_depth: u8,
    pub link_resolve_depth: u8,
    pub link_target_entity_resolve_depth: u8,
}

/// Structural query predicate. The model layer only emits equality tests
/// over well-known paths and conjunctions of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    All(Vec<Filter>),
    Eq {
        path: Vec<String>,
        literal: serde_json::Value,
    },
}

impl Filter {
    /// Equality test over a path of field names.
    pub fn eq<I, S>(path: I, literal: serde_json::Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Eq {
            path: path.into_iter().map(Into::into).collect(),
            literal,
        }
    }

    /// Conjunction of filters.
    #[must_use]
    pub fn all(filters: Vec<Filter>) -> Self {
        Self::All(filters)
    }
}

/// Answer to a structural query: matching roots plus resolved context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgraph {
    pub roots: Vec<EntityId>,
    pub vertices: HashMap<EntityId, PersistedEntity>,
    pub edges: Vec<LinkRecord>,
}
