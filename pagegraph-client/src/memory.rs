//! In-memory reference backend.
//!
//! Implements [`GraphApi`] over `tokio::sync::RwLock` maps. Keeps the full
//! version history per entity and logically-removed links, so it mirrors
//! the remote service's semantics closely enough to back every test in the
//! workspace and local development setups.
//!
//! Structural queries support the paths the model layer emits
//! (`id`, `ownedById`, `type.versionedUri` for entities; `source.id`,
//! `target.id`, `type.versionedUri` for links) at resolve depth zero.

use crate::api::{
    CreateEntityParams, CreateLinkParams, GraphApi, RemoveLinkParams, UpdateEntityParams,
};
use crate::error::{ClientResult, GraphApiError};
use crate::wire::{
    EntityMetadata, EntityTypeSchema, Filter, LinkRecord, LinkTypeSchema, PersistedEntity,
    ResolveDepths, Subgraph,
};
use async_trait::async_trait;
use pagegraph_types::{AccountId, EntityId, EntityVersion, VersionedUri};
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`GraphApi`] backend.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    /// Version history per entity; the last element is the latest version.
    entities: RwLock<HashMap<EntityId, Vec<PersistedEntity>>>,
    /// All links ever created, including logically removed ones.
    links: RwLock<Vec<LinkRecord>>,
    entity_types: RwLock<HashMap<VersionedUri, EntityTypeSchema>>,
    link_types: RwLock<HashMap<VersionedUri, LinkTypeSchema>>,
}

impl InMemoryGraph {
    /// Creates an empty graph with no registered types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity type so entities can reference it.
    pub async fn register_entity_type(&self, schema: EntityTypeSchema) {
        self.entity_types
            .write()
            .await
            .insert(schema.entity_type_id.clone(), schema);
    }

    /// Registers a link type so links can reference it.
    pub async fn register_link_type(&self, schema: LinkTypeSchema) {
        self.link_types
            .write()
            .await
            .insert(schema.link_type_id.clone(), schema);
    }

    /// Number of entities ever created (regardless of removal state).
    pub async fn entity_count(&self) -> usize {
        self.entities.read().await.len()
    }

    /// Number of versions recorded for one entity.
    pub async fn version_count(&self, entity_id: EntityId) -> usize {
        self.entities
            .read()
            .await
            .get(&entity_id)
            .map_or(0, Vec::len)
    }

    fn entity_matches(filter: &Filter, entity: &PersistedEntity) -> bool {
        match filter {
            Filter::All(filters) => filters.iter().all(|f| Self::entity_matches(f, entity)),
            Filter::Eq { path, literal } => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                let field = match segments.as_slice() {
                    ["id"] => json!(entity.metadata.entity_id.to_string()),
                    ["ownedById"] => json!(entity.metadata.owned_by_id.to_string()),
                    ["type", "versionedUri"] => {
                        json!(entity.metadata.entity_type_id.to_string())
                    }
                    _ => return false,
                };
                field == *literal
            }
        }
    }

    fn link_matches(filter: &Filter, link: &LinkRecord) -> bool {
        match filter {
            Filter::All(filters) => filters.iter().all(|f| Self::link_matches(f, link)),
            Filter::Eq { path, literal } => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                let field = match segments.as_slice() {
                    ["source", "id"] => json!(link.source_entity_id.to_string()),
                    ["target", "id"] => json!(link.target_entity_id.to_string()),
                    ["type", "versionedUri"] => json!(link.link_type_id.to_string()),
                    _ => return false,
                };
                field == *literal
            }
        }
    }
}

#[async_trait]
impl GraphApi for InMemoryGraph {
    async fn create_account_id(&self) -> ClientResult<AccountId> {
        Ok(AccountId::new())
    }

    async fn create_entity(&self, params: CreateEntityParams) -> ClientResult<EntityMetadata> {
        if !self
            .entity_types
            .read()
            .await
            .contains_key(&params.entity_type_id)
        {
            return Err(GraphApiError::TypeNotFound(params.entity_type_id));
        }

        let entity_id = params.entity_id.unwrap_or_default();
        let mut entities = self.entities.write().await;
        if entities.contains_key(&entity_id) {
            return Err(GraphApiError::Conflict(format!(
                "entity {entity_id} already exists"
            )));
        }

        let metadata = EntityMetadata {
            owned_by_id: params.owned_by_id,
            entity_id,
            version: EntityVersion::now(),
            entity_type_id: params.entity_type_id,
            created_by_id: params.actor_id,
            updated_by_id: params.actor_id,
            removed_by_id: None,
        };
        entities.insert(
            entity_id,
            vec![PersistedEntity {
                metadata: metadata.clone(),
                inner: params.properties,
            }],
        );
        debug!(%entity_id, "created entity");
        Ok(metadata)
    }

    async fn get_entity(&self, entity_id: EntityId) -> ClientResult<PersistedEntity> {
        let entities = self.entities.read().await;
        let latest = entities
            .get(&entity_id)
            .and_then(|versions| versions.last())
            .ok_or(GraphApiError::EntityNotFound(entity_id))?;
        if latest.metadata.removed_by_id.is_some() {
            return Err(GraphApiError::EntityNotFound(entity_id));
        }
        Ok(latest.clone())
    }

    async fn update_entity(&self, params: UpdateEntityParams) -> ClientResult<EntityMetadata> {
        let mut entities = self.entities.write().await;
        let versions = entities
            .get_mut(&params.entity_id)
            .ok_or(GraphApiError::EntityNotFound(params.entity_id))?;
        // Non-empty by construction; entities are created with one version.
        let latest = versions
            .last()
            .ok_or(GraphApiError::EntityNotFound(params.entity_id))?;

        let metadata = EntityMetadata {
            owned_by_id: latest.metadata.owned_by_id,
            entity_id: params.entity_id,
            version: latest.metadata.version.tick(),
            entity_type_id: params.entity_type_id,
            created_by_id: latest.metadata.created_by_id,
            updated_by_id: params.actor_id,
            removed_by_id: latest.metadata.removed_by_id,
        };
        versions.push(PersistedEntity {
            metadata: metadata.clone(),
            inner: params.properties,
        });
        debug!(entity_id = %params.entity_id, version = %metadata.version, "updated entity");
        Ok(metadata)
    }

    async fn get_entities_by_query(
        &self,
        query: Filter,
        _resolve_depths: ResolveDepths,
    ) -> ClientResult<Subgraph> {
        let entities = self.entities.read().await;
        let mut subgraph = Subgraph::default();
        for (entity_id, versions) in entities.iter() {
            let Some(latest) = versions.last() else {
                continue;
            };
            if latest.metadata.removed_by_id.is_none() && Self::entity_matches(&query, latest) {
                subgraph.roots.push(*entity_id);
                subgraph.vertices.insert(*entity_id, latest.clone());
            }
        }
        // Deterministic order for callers; v7 ids sort by creation time.
        subgraph.roots.sort();
        Ok(subgraph)
    }

    async fn create_link(&self, params: CreateLinkParams) -> ClientResult<LinkRecord> {
        {
            let entities = self.entities.read().await;
            for endpoint in [params.source_entity_id, params.target_entity_id] {
                if !entities.contains_key(&endpoint) {
                    return Err(GraphApiError::EntityNotFound(endpoint));
                }
            }
        }
        if !self
            .link_types
            .read()
            .await
            .contains_key(&params.link_type_id)
        {
            return Err(GraphApiError::TypeNotFound(params.link_type_id));
        }

        let record = LinkRecord {
            source_entity_id: params.source_entity_id,
            target_entity_id: params.target_entity_id,
            link_type_id: params.link_type_id,
            index: params.index,
            owned_by_id: params.owned_by_id,
            created_by_id: params.actor_id,
            removed_by_id: None,
        };
        self.links.write().await.push(record.clone());
        debug!(
            source = %record.source_entity_id,
            target = %record.target_entity_id,
            "created link"
        );
        Ok(record)
    }

    async fn remove_link(&self, params: RemoveLinkParams) -> ClientResult<()> {
        let mut links = self.links.write().await;
        let link = links
            .iter_mut()
            .find(|link| {
                link.removed_by_id.is_none()
                    && link.source_entity_id == params.source_entity_id
                    && link.target_entity_id == params.target_entity_id
                    && link.link_type_id == params.link_type_id
                    && link.index == params.index
            })
            .ok_or(GraphApiError::LinkNotFound)?;
        link.removed_by_id = Some(params.actor_id);
        debug!(
            source = %params.source_entity_id,
            target = %params.target_entity_id,
            "removed link"
        );
        Ok(())
    }

    async fn get_links_by_query(&self, query: Filter) -> ClientResult<Vec<LinkRecord>> {
        let links = self.links.read().await;
        Ok(links
            .iter()
            .filter(|link| link.removed_by_id.is_none() && Self::link_matches(&query, link))
            .cloned()
            .collect())
    }

    async fn get_entity_type(
        &self,
        entity_type_id: &VersionedUri,
    ) -> ClientResult<EntityTypeSchema> {
        self.entity_types
            .read()
            .await
            .get(entity_type_id)
            .cloned()
            .ok_or_else(|| GraphApiError::TypeNotFound(entity_type_id.clone()))
    }

    async fn get_link_type(&self, link_type_id: &VersionedUri) -> ClientResult<LinkTypeSchema> {
        self.link_types
            .read()
            .await
            .get(link_type_id)
            .cloned()
            .ok_or_else(|| GraphApiError::TypeNotFound(link_type_id.clone()))
    }
}
