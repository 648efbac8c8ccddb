//! The `GraphApi` trait — everything the core consumes from the service.

use crate::error::ClientResult;
use crate::wire::{
    EntityMetadata, EntityTypeSchema, Filter, LinkRecord, LinkTypeSchema, PersistedEntity,
    ResolveDepths, Subgraph,
};
use async_trait::async_trait;
use pagegraph_types::{AccountId, EntityId, Properties, VersionedUri};
use serde::{Deserialize, Serialize};

/// Parameters for creating a new entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityParams {
    pub owned_by_id: AccountId,
    pub entity_type_id: VersionedUri,
    pub properties: Properties,
    /// Generated by the service when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    pub actor_id: AccountId,
}

/// Parameters for writing a new version of an existing entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntityParams {
    pub entity_id: EntityId,
    pub entity_type_id: VersionedUri,
    pub properties: Properties,
    pub actor_id: AccountId,
}

/// Parameters for creating a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkParams {
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub link_type_id: VersionedUri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    pub owned_by_id: AccountId,
    pub actor_id: AccountId,
}

/// Parameters for logically removing a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLinkParams {
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub link_type_id: VersionedUri,
    /// Disambiguates between live links sharing source, target and type,
    /// which happens when one block is attached to a page more than once.
    pub index: Option<i32>,
    pub actor_id: AccountId,
}

/// Remote CRUD + query surface of the versioned entity graph.
///
/// Every operation is an independent network call; there are no
/// transactions across calls. Implementations must guarantee that
/// [`update_entity`](GraphApi::update_entity) assigns a version strictly
/// greater than the entity's current latest
/// (see [`EntityVersion`](pagegraph_types::EntityVersion)).
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Mints a fresh account id.
    async fn create_account_id(&self) -> ClientResult<AccountId>;

    /// Persists a new entity and returns its first version's metadata.
    async fn create_entity(&self, params: CreateEntityParams) -> ClientResult<EntityMetadata>;

    /// Fetches the latest version of an entity.
    async fn get_entity(&self, entity_id: EntityId) -> ClientResult<PersistedEntity>;

    /// Writes a new version carrying the full replacement property map.
    async fn update_entity(&self, params: UpdateEntityParams) -> ClientResult<EntityMetadata>;

    /// Structural query over entities, resolving context to the given
    /// depths.
    async fn get_entities_by_query(
        &self,
        query: Filter,
        resolve_depths: ResolveDepths,
    ) -> ClientResult<Subgraph>;

    /// Creates a typed edge between two already-persisted entities.
    async fn create_link(&self, params: CreateLinkParams) -> ClientResult<LinkRecord>;

    /// Logically removes a link; history stays queryable server-side.
    async fn remove_link(&self, params: RemoveLinkParams) -> ClientResult<()>;

    /// Structural query over live links.
    async fn get_links_by_query(&self, query: Filter) -> ClientResult<Vec<LinkRecord>>;

    /// Fetches an entity type schema by its versioned URI.
    async fn get_entity_type(&self, entity_type_id: &VersionedUri)
    -> ClientResult<EntityTypeSchema>;

    /// Fetches a link type schema by its versioned URI.
    async fn get_link_type(&self, link_type_id: &VersionedUri) -> ClientResult<LinkTypeSchema>;
}
