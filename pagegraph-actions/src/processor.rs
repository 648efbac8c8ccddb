//! Sequential execution of a page-update batch.

use crate::actions::{
    CreateEntityAction, InsertBlockAction, MoveBlockAction, RemoveBlockAction,
    SwapBlockDataAction, UpdateEntityAction, UpdatePageAction,
};
use crate::error::{ActionError, BatchError};
use crate::placeholder::{PlaceholderPayload, PlaceholderResultsMap};
use pagegraph_client::GraphApi;
use pagegraph_model::{
    Block, Entity, EntityDefinition, ModelError, Page, PropertyPatch, create_entity_with_links,
};
use pagegraph_types::{AccountId, EntityId, TypeIdentifier};
use tracing::debug;

/// A batch of actions against one page, applied strictly in order.
///
/// There is no rollback: when action `k` fails, actions `0..k` stay
/// persisted and the error names `k`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePageBatch {
    pub actor_id: AccountId,
    pub page_entity_id: EntityId,
    pub actions: Vec<UpdatePageAction>,
}

/// What a successful batch returns: the page after all actions, plus
/// every placeholder assignment for the client to patch its local state.
#[derive(Debug)]
pub struct BatchOutcome {
    pub page: Page,
    pub placeholders: Vec<PlaceholderPayload>,
}

impl UpdatePageBatch {
    /// Runs the batch. The target page is loaded up front, so a batch
    /// against a missing or non-page entity fails before any action runs.
    pub async fn execute(self, api: &dyn GraphApi) -> Result<BatchOutcome, BatchError> {
        let page = Page::by_entity_id(api, self.page_entity_id).await?;
        debug!(
            page = %self.page_entity_id,
            actions = self.actions.len(),
            "executing page-update batch"
        );

        let mut placeholders = PlaceholderResultsMap::new();
        for (index, action) in self.actions.into_iter().enumerate() {
            apply(api, &mut placeholders, &page, action, self.actor_id)
                .await
                .map_err(|source| BatchError::Action { index, source })?;
        }

        // Actions may have produced new page versions; return the latest.
        let page = Page::by_entity_id(api, self.page_entity_id).await?;
        Ok(BatchOutcome {
            page,
            placeholders: placeholders.results(),
        })
    }
}

async fn apply(
    api: &dyn GraphApi,
    placeholders: &mut PlaceholderResultsMap,
    page: &Page,
    action: UpdatePageAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    match action {
        UpdatePageAction::CreateEntity(action) => {
            create_entity(api, placeholders, action, actor_id).await
        }
        UpdatePageAction::InsertBlock(action) => {
            insert_block(api, placeholders, page, action, actor_id).await
        }
        UpdatePageAction::SwapBlockData(action) => {
            swap_block_data(api, placeholders, &action, actor_id).await
        }
        UpdatePageAction::UpdateEntity(action) => {
            update_entity(api, placeholders, action, actor_id).await
        }
        UpdatePageAction::MoveBlock(action) => move_block(api, page, &action, actor_id).await,
        UpdatePageAction::RemoveBlock(action) => remove_block(api, page, &action, actor_id).await,
    }
}

/// Resolves a definition against the placeholder map and obtains its
/// entity: an existing reference is fetched, anything else goes through
/// linked-tree creation so nested definitions work.
async fn create_entity_with_placeholders(
    api: &dyn GraphApi,
    placeholders: &PlaceholderResultsMap,
    owned_by_id: AccountId,
    definition: &EntityDefinition,
    actor_id: AccountId,
) -> Result<Entity, ActionError> {
    let resolved = placeholders.resolve_definition(definition)?;
    if resolved.existing_entity.is_none()
        && let (Some(properties), [TypeIdentifier::Real(entity_type_id)]) = (
            &resolved.entity_properties,
            resolved.entity_type_ids.as_slice(),
        )
    {
        let entity = create_entity_with_links(
            api,
            owned_by_id,
            entity_type_id.clone(),
            properties.clone(),
            resolved.linked_entities.clone(),
            actor_id,
        )
        .await?;
        return Ok(entity);
    }
    // Existing references and malformed definitions share the model's
    // validation path.
    Ok(Entity::get_or_create(api, owned_by_id, &resolved, actor_id).await?)
}

async fn create_entity(
    api: &dyn GraphApi,
    placeholders: &mut PlaceholderResultsMap,
    action: CreateEntityAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    let entity = create_entity_with_placeholders(
        api,
        placeholders,
        action.owned_by_id,
        &action.entity,
        actor_id,
    )
    .await?;
    placeholders.register(action.entity_placeholder_id.as_ref(), entity.entity_id);
    Ok(())
}

async fn insert_block(
    api: &dyn GraphApi,
    placeholders: &mut PlaceholderResultsMap,
    page: &Page,
    action: InsertBlockAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    let data = create_entity_with_placeholders(
        api,
        placeholders,
        action.owned_by_id,
        &action.entity,
        actor_id,
    )
    .await?;
    placeholders.register(action.entity_placeholder_id.as_ref(), data.entity_id);

    let block = match (&action.existing_block_entity_id, &action.component_id) {
        (Some(identifier), None) => {
            let block_entity_id = placeholders.resolve_entity(identifier)?;
            Block::by_entity_id(api, block_entity_id).await?
        }
        (None, Some(component_id)) => {
            Block::create(api, &data, component_id, action.owned_by_id, actor_id).await?
        }
        (Some(_), Some(_)) => {
            return Err(ModelError::InvalidInput(
                "cannot set a component id when reusing an existing block entity".to_owned(),
            )
            .into());
        }
        (None, None) => {
            return Err(ModelError::InvalidInput(
                "exactly one of an existing block entity id or a component id must be given"
                    .to_owned(),
            )
            .into());
        }
    };
    placeholders.register(action.block_placeholder_id.as_ref(), block.entity().entity_id);

    page.insert_block(api, &block, action.position, actor_id).await?;
    Ok(())
}

async fn swap_block_data(
    api: &dyn GraphApi,
    placeholders: &PlaceholderResultsMap,
    action: &SwapBlockDataAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    let block_entity_id = placeholders.resolve_entity(&action.block_entity_id)?;
    let new_data_entity_id = placeholders.resolve_entity(&action.new_entity_entity_id)?;

    let block = Block::by_entity_id(api, block_entity_id).await?;
    let new_data = Entity::get_latest(api, new_data_entity_id).await?;
    block.update_block_data(api, &new_data, actor_id).await?;
    Ok(())
}

async fn update_entity(
    api: &dyn GraphApi,
    placeholders: &PlaceholderResultsMap,
    action: UpdateEntityAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    let entity_id = placeholders.resolve_entity(&action.entity_id)?;
    let entity = Entity::get_latest(api, entity_id).await?;
    let patches = action
        .properties
        .iter()
        .map(|(base_uri, value)| PropertyPatch {
            property_type_base_uri: base_uri.clone(),
            value: value.clone(),
        })
        .collect();
    entity.update_properties(api, patches, actor_id).await?;
    Ok(())
}

async fn move_block(
    api: &dyn GraphApi,
    page: &Page,
    action: &MoveBlockAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    page.move_block(api, action.current_position, action.new_position, actor_id)
        .await?;
    Ok(())
}

async fn remove_block(
    api: &dyn GraphApi,
    page: &Page,
    action: &RemoveBlockAction,
    actor_id: AccountId,
) -> Result<(), ActionError> {
    page.remove_block(api, action.position, actor_id).await?;
    Ok(())
}
