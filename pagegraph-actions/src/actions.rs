//! The page-update action vocabulary.
//!
//! A batch is a sequence of these actions against one page. Id positions
//! are [`Identifier`]s so later actions can reference entities created by
//! earlier ones through placeholders.

use pagegraph_model::EntityDefinition;
use pagegraph_types::{AccountId, Identifier, PlaceholderId, Properties};
use serde::{Deserialize, Serialize};

/// Creates a standalone entity (optionally a whole linked tree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityAction {
    pub owned_by_id: AccountId,
    /// Registers the created entity's id for later actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_placeholder_id: Option<PlaceholderId>,
    pub entity: EntityDefinition,
}

/// Attaches a block to the page: either a freshly created one wrapping the
/// action's data entity, or an already-existing block entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertBlockAction {
    pub owned_by_id: AccountId,
    /// Renderer for a newly created block. Exactly one of this and
    /// `existing_block_entity_id` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Reuses an existing block instead of creating one; may reference a
    /// block created earlier in the batch through its placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_block_entity_id: Option<Identifier>,
    /// The block's data entity: existing, new, or a placeholder reference.
    pub entity: EntityDefinition,
    /// Registers the block entity's id for later actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_placeholder_id: Option<PlaceholderId>,
    /// Registers the data entity's id for later actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_placeholder_id: Option<PlaceholderId>,
    /// Position in the page contents; appends when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

/// Repoints a block at different data, keeping the block's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBlockDataAction {
    pub block_entity_id: Identifier,
    pub new_entity_entity_id: Identifier,
}

/// Merges the supplied properties into an entity's latest version by key;
/// properties not named by the action are left as they were.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntityAction {
    pub entity_id: Identifier,
    pub properties: Properties,
}

/// Moves a block within the page contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBlockAction {
    pub current_position: usize,
    pub new_position: usize,
}

/// Detaches the block at a position from the page contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBlockAction {
    pub position: usize,
}

/// One action of a page-update batch. Exactly one variant per payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdatePageAction {
    CreateEntity(CreateEntityAction),
    InsertBlock(InsertBlockAction),
    SwapBlockData(SwapBlockDataAction),
    UpdateEntity(UpdateEntityAction),
    MoveBlock(MoveBlockAction),
    RemoveBlock(RemoveBlockAction),
}
