//! The page model.
//!
//! A page owns an ordered sequence of blocks (contents links, integer
//! indices) and may sit under a parent page (parent link). Ordering among
//! sibling pages uses a fractional key stored on the page itself, computed
//! from the caller-supplied `prev_index`/`next_index` markers.

use crate::block::Block;
use crate::entity::{CreateEntity, Entity, PropertyPatch};
use crate::error::{ModelError, ModelResult};
use crate::link::{CreateLink, Link};
use crate::system;
use pagegraph_client::GraphApi;
use pagegraph_types::{AccountId, EntityId, Properties, key_between};
use serde_json::json;
use tracing::debug;

/// An entity validated to be of the page type.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    entity: Entity,
}

impl Page {
    /// Wraps an entity, checking its type tag.
    pub fn from_entity(entity: Entity) -> ModelResult<Self> {
        if entity.entity_type.entity_type_id != system::page_entity_type_id() {
            return Err(ModelError::NotFound(format!(
                "entity {} is not a page",
                entity.entity_id
            )));
        }
        Ok(Self { entity })
    }

    /// Creates an empty page with a title and an initial ordering key.
    pub async fn create(
        api: &dyn GraphApi,
        owned_by_id: AccountId,
        title: &str,
        actor_id: AccountId,
    ) -> ModelResult<Self> {
        let entity_type = api.get_entity_type(&system::page_entity_type_id()).await?;
        let index = key_between(None, None)
            .map_err(|err| ModelError::Internal(err.to_string()))?;
        let properties = Properties::new()
            .with_property(system::title_property_type_base_uri(), json!(title))
            .with_property(system::index_property_type_base_uri(), json!(index));
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
        Ok(Self { entity })
    }

    /// Fetches a page by its entity id.
    pub async fn by_entity_id(api: &dyn GraphApi, entity_id: EntityId) -> ModelResult<Self> {
        let entity = Entity::get_latest(api, entity_id).await?;
        Self::from_entity(entity)
    }

    /// The wrapped entity.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// The page title.
    pub fn title(&self) -> ModelResult<&str> {
        self.entity
            .properties
            .get(&system::title_property_type_base_uri())
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                ModelError::Internal(format!(
                    "page {} has no title property",
                    self.entity.entity_id
                ))
            })
    }

    /// The page's blocks, in contents order.
    pub async fn blocks(&self, api: &dyn GraphApi) -> ModelResult<Vec<Block>> {
        let mut blocks = Vec::new();
        for link in self.contents_links(api).await? {
            blocks.push(Block::by_entity_id(api, link.target_entity_id()).await?);
        }
        Ok(blocks)
    }

    /// Inserts a block into the page contents. An explicit position shifts
    /// the blocks at and after it; no position appends.
    pub async fn insert_block(
        &self,
        api: &dyn GraphApi,
        block: &Block,
        position: Option<i32>,
        actor_id: AccountId,
    ) -> ModelResult<()> {
        let link_type = api.get_link_type(&system::contents_link_type_id()).await?;
        let params = |index: i32| CreateLink {
            source_entity_id: self.entity.entity_id,
            target_entity_id: block.entity().entity_id,
            link_type: link_type.clone(),
            index: Some(index),
            owned_by_id: self.entity.owned_by_id,
            actor_id,
        };

        match position {
            Some(position) => {
                Link::create(api, params(position)).await?;
            }
            None => {
                let siblings =
                    Link::by_source(api, self.entity.entity_id, Some(&link_type)).await?;
                let next = siblings
                    .iter()
                    .filter_map(Link::index)
                    .max()
                    .map_or(0, |max| max + 1);
                Link::create_without_updating_siblings(api, params(next)).await?;
            }
        }
        debug!(page = %self.entity.entity_id, block = %block.entity().entity_id, "inserted block");
        Ok(())
    }

    /// Moves the block at `current_position` to `new_position`, rewriting
    /// contents indices densely.
    pub async fn move_block(
        &self,
        api: &dyn GraphApi,
        current_position: usize,
        new_position: usize,
        actor_id: AccountId,
    ) -> ModelResult<()> {
        let mut links = self.contents_links(api).await?;
        let count = links.len();
        if current_position >= count || new_position >= count {
            return Err(ModelError::InvalidInput(format!(
                "block position out of range: {} blocks, move {current_position} -> {new_position}",
                count
            )));
        }
        if current_position == new_position {
            return Ok(());
        }

        let moved = links.remove(current_position);
        links.insert(new_position, moved);

        // Links have no update-in-place; rewrite every misplaced link as a
        // remove + recreate at its dense index.
        for (position, link) in links.iter().enumerate() {
            let index = i32::try_from(position)
                .map_err(|_| ModelError::Internal("contents index overflow".to_owned()))?;
            if link.index() == Some(index) {
                continue;
            }
            link.remove(api, actor_id).await?;
            Link::create_without_updating_siblings(
                api,
                CreateLink {
                    source_entity_id: link.source_entity_id(),
                    target_entity_id: link.target_entity_id(),
                    link_type: link.link_type().clone(),
                    index: Some(index),
                    owned_by_id: self.entity.owned_by_id,
                    actor_id,
                },
            )
            .await?;
        }
        debug!(
            page = %self.entity.entity_id,
            "moved block {current_position} -> {new_position}"
        );
        Ok(())
    }

    /// Removes the block at `position` from the page contents. The block
    /// entity itself stays live.
    pub async fn remove_block(
        &self,
        api: &dyn GraphApi,
        position: usize,
        actor_id: AccountId,
    ) -> ModelResult<()> {
        let links = self.contents_links(api).await?;
        let link = links.get(position).ok_or_else(|| {
            ModelError::InvalidInput(format!(
                "block position out of range: {} blocks, remove {position}",
                links.len()
            ))
        })?;
        link.remove(api, actor_id).await?;
        debug!(page = %self.entity.entity_id, "removed block at {position}");
        Ok(())
    }

    /// Sets (or clears) this page's parent and re-keys it between
    /// `prev_index` and `next_index`.
    ///
    /// Self-parenting fails before any persistence call. Returns the new
    /// page version.
    pub async fn set_parent_page(
        &self,
        api: &dyn GraphApi,
        parent: Option<&Page>,
        prev_index: Option<&str>,
        next_index: Option<&str>,
        actor_id: AccountId,
    ) -> ModelResult<Page> {
        if let Some(parent) = parent
            && parent.entity.entity_id == self.entity.entity_id
        {
            return Err(ModelError::InvalidInput(
                "a page cannot be the parent of itself".to_owned(),
            ));
        }
        let index = key_between(prev_index, next_index)
            .map_err(|err| ModelError::InvalidInput(err.to_string()))?;

        let link_type = api.get_link_type(&system::parent_link_type_id()).await?;
        for link in Link::by_source(api, self.entity.entity_id, Some(&link_type)).await? {
            link.remove(api, actor_id).await?;
        }

        if let Some(parent) = parent {
            Link::create_without_updating_siblings(
                api,
                CreateLink {
                    source_entity_id: self.entity.entity_id,
                    target_entity_id: parent.entity.entity_id,
                    link_type,
                    index: None,
                    owned_by_id: self.entity.owned_by_id,
                    actor_id,
                },
            )
            .await?;
        }

        let entity = self
            .entity
            .update_property(
                api,
                PropertyPatch {
                    property_type_base_uri: system::index_property_type_base_uri(),
                    value: json!(index),
                },
                actor_id,
            )
            .await?;
        Ok(Page { entity })
    }

    /// The parent page, if this page has one.
    pub async fn parent_page(&self, api: &dyn GraphApi) -> ModelResult<Option<Page>> {
        let link_type = api.get_link_type(&system::parent_link_type_id()).await?;
        let links = Link::by_source(api, self.entity.entity_id, Some(&link_type)).await?;
        match links.first() {
            Some(link) => Ok(Some(Self::by_entity_id(api, link.target_entity_id()).await?)),
            None => Ok(None),
        }
    }

    async fn contents_links(&self, api: &dyn GraphApi) -> ModelResult<Vec<Link>> {
        let link_type = api.get_link_type(&system::contents_link_type_id()).await?;
        Link::by_source(api, self.entity.entity_id, Some(&link_type)).await
    }
}
