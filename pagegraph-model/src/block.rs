//! The block model.
//!
//! A block is an entity whose content lives in a separate "block data"
//! entity, referenced through a block-data link. The block also carries a
//! component id naming its renderer. Swapping block data repoints the link
//! without changing the block's identity.

use crate::entity::{CreateEntity, Entity};
use crate::error::{ModelError, ModelResult};
use crate::link::Link;
use crate::system;
use pagegraph_client::GraphApi;
use pagegraph_types::{AccountId, EntityId, Properties};
use serde_json::json;
use tracing::debug;

/// An entity validated to be of the block type.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    entity: Entity,
}

impl Block {
    /// Wraps an entity, checking its type tag.
    pub fn from_entity(entity: Entity) -> ModelResult<Self> {
        if entity.entity_type.entity_type_id != system::block_entity_type_id() {
            return Err(ModelError::NotFound(format!(
                "entity {} is not a block",
                entity.entity_id
            )));
        }
        Ok(Self { entity })
    }

    /// Creates a block entity pointing at `block_data` as its content.
    pub async fn create(
        api: &dyn GraphApi,
        block_data: &Entity,
        component_id: &str,
        owned_by_id: AccountId,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        let entity_type = api.get_entity_type(&system::block_entity_type_id()).await?;
        let properties = Properties::new().with_property(
            system::component_id_property_type_base_uri(),
            json!(component_id),
        );
        let entity = Entity::create(
            api,
            CreateEntity {
                owned_by_id,
                entity_type,
                properties,
                entity_id: None,
                actor_id,
            },
        )
        .await?;

        let link_type = api.get_link_type(&system::block_data_link_type_id()).await?;
        entity
            .create_outgoing_link_without_reorder(
                api, link_type, block_data, None, owned_by_id, actor_id,
            )
            .await?;
        debug!(block = %entity.entity_id, data = %block_data.entity_id, "created block");
        Ok(Self { entity })
    }

    /// Fetches a block by its entity id.
    pub async fn by_entity_id(api: &dyn GraphApi, entity_id: EntityId) -> ModelResult<Self> {
        let entity = Entity::get_latest(api, entity_id).await?;
        Self::from_entity(entity)
    }

    /// The wrapped entity (the block itself, not its data).
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_entity(self) -> Entity {
        self.entity
    }

    /// The component id naming this block's renderer.
    pub fn component_id(&self) -> ModelResult<&str> {
        self.entity
            .properties
            .get(&system::component_id_property_type_base_uri())
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                ModelError::Internal(format!(
                    "block {} has no component id property",
                    self.entity.entity_id
                ))
            })
    }

    /// The latest version of this block's data entity.
    pub async fn block_data(&self, api: &dyn GraphApi) -> ModelResult<Entity> {
        let link = self.data_link(api).await?;
        Entity::get_latest(api, link.target_entity_id()).await
    }

    /// Repoints the block-data link at `new_data`, leaving the block's
    /// identity untouched.
    pub async fn update_block_data(
        &self,
        api: &dyn GraphApi,
        new_data: &Entity,
        actor_id: AccountId,
    ) -> ModelResult<()> {
        let link = self.data_link(api).await?;
        if link.target_entity_id() == new_data.entity_id {
            return Err(ModelError::InvalidInput(format!(
                "block {} already links to entity {}",
                self.entity.entity_id, new_data.entity_id
            )));
        }
        let link_type = link.link_type().clone();
        link.remove(api, actor_id).await?;
        self.entity
            .create_outgoing_link_without_reorder(
                api,
                link_type,
                new_data,
                None,
                self.entity.owned_by_id,
                actor_id,
            )
            .await?;
        debug!(
            block = %self.entity.entity_id,
            data = %new_data.entity_id,
            "swapped block data"
        );
        Ok(())
    }

    async fn data_link(&self, api: &dyn GraphApi) -> ModelResult<Link> {
        let link_type = api.get_link_type(&system::block_data_link_type_id()).await?;
        let links = self.entity.outgoing_links(api, Some(&link_type)).await?;
        links.into_iter().next().ok_or_else(|| {
            ModelError::Internal(format!(
                "block {} has no block data link",
                self.entity.entity_id
            ))
        })
    }
}
