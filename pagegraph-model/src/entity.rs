//! The entity model.
//!
//! An [`Entity`] value represents exactly one version. Updates go through
//! the graph service and return a fresh value for the new version; the
//! original keeps describing the old one.

use crate::error::{ModelError, ModelResult};
use crate::link::{CreateLink, Link};
use crate::tree::{EntityDefinition, require_real};
use pagegraph_client::{
    CreateEntityParams, EntityMetadata, EntityTypeSchema, Filter, GraphApi, LinkTypeSchema,
    PersistedEntity, ResolveDepths, UpdateEntityParams,
};
use pagegraph_types::{AccountId, BaseUri, EntityId, EntityVersion, Properties, VersionedUri};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Entity and link type schemas cached for one resolution batch.
///
/// Entities reference types by versioned URI; resolving a page full of
/// blocks would otherwise refetch the same handful of schemas once per
/// entity. One cache per batch, never shared across requests.
#[derive(Debug, Default)]
pub struct TypeCache {
    entity_types: Mutex<HashMap<VersionedUri, EntityTypeSchema>>,
    link_types: Mutex<HashMap<VersionedUri, LinkTypeSchema>>,
}

impl TypeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an entity type, hitting the service at most once per URI.
    pub async fn entity_type(
        &self,
        api: &dyn GraphApi,
        entity_type_id: &VersionedUri,
    ) -> ModelResult<EntityTypeSchema> {
        let mut cached = self.entity_types.lock().await;
        if let Some(schema) = cached.get(entity_type_id) {
            return Ok(schema.clone());
        }
        let schema = api.get_entity_type(entity_type_id).await?;
        cached.insert(entity_type_id.clone(), schema.clone());
        Ok(schema)
    }

    /// Resolves a link type, hitting the service at most once per URI.
    pub async fn link_type(
        &self,
        api: &dyn GraphApi,
        link_type_id: &VersionedUri,
    ) -> ModelResult<LinkTypeSchema> {
        let mut cached = self.link_types.lock().await;
        if let Some(schema) = cached.get(link_type_id) {
            return Ok(schema.clone());
        }
        let schema = api.get_link_type(link_type_id).await?;
        cached.insert(link_type_id.clone(), schema.clone());
        Ok(schema)
    }
}

/// Parameters for [`Entity::create`].
#[derive(Debug, Clone)]
pub struct CreateEntity {
    pub owned_by_id: AccountId,
    pub entity_type: EntityTypeSchema,
    pub properties: Properties,
    /// Generated by the service when absent.
    pub entity_id: Option<EntityId>,
    pub actor_id: AccountId,
}

/// One property update, merged by key over the current map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    pub property_type_base_uri: BaseUri,
    pub value: serde_json::Value,
}

/// One version of a versioned, typed, property-bearing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub owned_by_id: AccountId,
    pub entity_id: EntityId,
    pub version: EntityVersion,
    pub entity_type: EntityTypeSchema,
    pub properties: Properties,
    pub created_by_id: AccountId,
    pub updated_by_id: AccountId,
    pub removed_by_id: Option<AccountId>,
}

impl Entity {
    pub(crate) fn from_parts(
        metadata: EntityMetadata,
        properties: Properties,
        entity_type: EntityTypeSchema,
    ) -> Self {
        Self {
            owned_by_id: metadata.owned_by_id,
            entity_id: metadata.entity_id,
            version: metadata.version,
            entity_type,
            properties,
            created_by_id: metadata.created_by_id,
            updated_by_id: metadata.updated_by_id,
            removed_by_id: metadata.removed_by_id,
        }
    }

    /// Builds a model from a service envelope, resolving the entity type
    /// through the batch cache when one is given.
    pub async fn from_persisted(
        api: &dyn GraphApi,
        persisted: PersistedEntity,
        cache: Option<&TypeCache>,
    ) -> ModelResult<Self> {
        let entity_type = match cache {
            Some(cache) => {
                cache
                    .entity_type(api, &persisted.metadata.entity_type_id)
                    .await?
            }
            None => api.get_entity_type(&persisted.metadata.entity_type_id).await?,
        };
        Ok(Self::from_parts(persisted.metadata, persisted.inner, entity_type))
    }

    /// Persists a new entity.
    pub async fn create(api: &dyn GraphApi, params: CreateEntity) -> ModelResult<Self> {
        let metadata = api
            .create_entity(CreateEntityParams {
                owned_by_id: params.owned_by_id,
                entity_type_id: params.entity_type.entity_type_id.clone(),
                properties: params.properties.clone(),
                entity_id: params.entity_id,
                actor_id: params.actor_id,
            })
            .await?;
        debug!(entity_id = %metadata.entity_id, "created entity");
        Ok(Self::from_parts(metadata, params.properties, params.entity_type))
    }

    /// Gets an existing entity or creates a new one, depending on the
    /// definition's shape.
    ///
    /// An existing-entity reference is fetched (`NotFound` when missing).
    /// Otherwise the definition must carry properties and exactly one type
    /// identifier; anything else is `InvalidInput`.
    pub async fn get_or_create(
        api: &dyn GraphApi,
        owned_by_id: AccountId,
        definition: &EntityDefinition,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        if let Some(existing) = &definition.existing_entity {
            let entity_id = require_real(&existing.entity_id, "existing entity id")?;
            return Self::get_latest(api, entity_id).await;
        }

        let Some(properties) = &definition.entity_properties else {
            return Err(ModelError::InvalidInput(
                "either an existing entity reference or properties with a type must be given"
                    .to_owned(),
            ));
        };

        let entity_type_id = match definition.entity_type_ids.as_slice() {
            [id] => require_real(id, "entity type id")?,
            [] => {
                return Err(ModelError::InvalidInput(
                    "no type identifier given; exactly one is required".to_owned(),
                ));
            }
            _ => {
                return Err(ModelError::InvalidInput(
                    "multiple type identifiers given; exactly one is required".to_owned(),
                ));
            }
        };

        let entity_type = api.get_entity_type(&entity_type_id).await?;
        Self::create(
            api,
            CreateEntity {
                owned_by_id,
                entity_type,
                properties: properties.clone(),
                entity_id: None,
                actor_id,
            },
        )
        .await
    }

    /// Fetches the latest version of an entity.
    pub async fn get_latest(api: &dyn GraphApi, entity_id: EntityId) -> ModelResult<Self> {
        let persisted = api.get_entity(entity_id).await?;
        Self::from_persisted(api, persisted, None).await
    }

    /// Fetches a specific version of an entity.
    pub async fn get_version(
        _api: &dyn GraphApi,
        _entity_id: EntityId,
        _version: EntityVersion,
    ) -> ModelResult<Self> {
        Err(ModelError::NotImplemented(
            "fetching a specific entity version",
        ))
    }

    /// Structural query returning models, sharing one type cache across
    /// the whole result set.
    pub async fn by_query(
        api: &dyn GraphApi,
        query: Filter,
        resolve_depths: ResolveDepths,
    ) -> ModelResult<Vec<Self>> {
        let subgraph = api.get_entities_by_query(query, resolve_depths).await?;
        let cache = TypeCache::new();
        let mut models = Vec::with_capacity(subgraph.roots.len());
        for root in &subgraph.roots {
            let vertex = subgraph.vertices.get(root).ok_or_else(|| {
                ModelError::Internal(format!("subgraph root {root} has no vertex"))
            })?;
            models.push(Self::from_persisted(api, vertex.clone(), Some(&cache)).await?);
        }
        Ok(models)
    }

    /// Fetches the latest version of this entity.
    pub async fn latest_version(&self, api: &dyn GraphApi) -> ModelResult<Self> {
        Self::get_latest(api, self.entity_id).await
    }

    /// Writes a new version carrying `properties` as the full replacement
    /// map. Returns the new version; `self` keeps describing the old one.
    pub async fn update(
        &self,
        api: &dyn GraphApi,
        properties: Properties,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        let metadata = api
            .update_entity(UpdateEntityParams {
                entity_id: self.entity_id,
                entity_type_id: self.entity_type.entity_type_id.clone(),
                properties: properties.clone(),
                actor_id,
            })
            .await?;
        debug!(entity_id = %self.entity_id, version = %metadata.version, "updated entity");
        Ok(Self::from_parts(metadata, properties, self.entity_type.clone()))
    }

    /// Read-modify-write convenience over [`update`](Self::update): merges
    /// the patches into the current map by key, last write wins per key.
    pub async fn update_properties(
        &self,
        api: &dyn GraphApi,
        patches: Vec<PropertyPatch>,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        let properties = patches.into_iter().fold(self.properties.clone(), |map, patch| {
            map.with_property(patch.property_type_base_uri, patch.value)
        });
        self.update(api, properties, actor_id).await
    }

    /// Updates a single top-level property.
    pub async fn update_property(
        &self,
        api: &dyn GraphApi,
        patch: PropertyPatch,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        self.update_properties(api, vec![patch], actor_id).await
    }

    /// Creates an outgoing link to `target`, shifting siblings when an
    /// explicit index collides. See [`Link::create`].
    pub async fn create_outgoing_link(
        &self,
        api: &dyn GraphApi,
        link_type: LinkTypeSchema,
        target: &Entity,
        index: Option<i32>,
        owned_by_id: AccountId,
        actor_id: AccountId,
    ) -> ModelResult<Link> {
        Link::create(
            api,
            CreateLink {
                source_entity_id: self.entity_id,
                target_entity_id: target.entity_id,
                link_type,
                index,
                owned_by_id,
                actor_id,
            },
        )
        .await
    }

    /// Creates an outgoing link without touching sibling indices. See
    /// [`Link::create_without_updating_siblings`].
    pub async fn create_outgoing_link_without_reorder(
        &self,
        api: &dyn GraphApi,
        link_type: LinkTypeSchema,
        target: &Entity,
        index: Option<i32>,
        owned_by_id: AccountId,
        actor_id: AccountId,
    ) -> ModelResult<Link> {
        Link::create_without_updating_siblings(
            api,
            CreateLink {
                source_entity_id: self.entity_id,
                target_entity_id: target.entity_id,
                link_type,
                index,
                owned_by_id,
                actor_id,
            },
        )
        .await
    }

    /// Outgoing links of this entity, optionally restricted to one type,
    /// ordered by index.
    pub async fn outgoing_links(
        &self,
        api: &dyn GraphApi,
        link_type: Option<&LinkTypeSchema>,
    ) -> ModelResult<Vec<Link>> {
        Link::by_source(api, self.entity_id, link_type).await
    }
}
