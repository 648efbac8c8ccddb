//! Reconciliation of a fetched content tree with the local draft overlay.

use crate::draft::{DraftEntity, DraftId, SavedEntity};
use crate::error::{StoreError, StoreResult};
use pagegraph_types::EntityId;
use std::collections::HashMap;
use tracing::debug;

/// The client's view of a page's entities: the server-confirmed graph and
/// the draft overlay on top of it.
///
/// Every entity reachable from `saved` has exactly one draft row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    pub saved: HashMap<EntityId, SavedEntity>,
    pub draft: HashMap<DraftId, DraftEntity>,
}

impl EntityStore {
    /// The draft row carrying `entity_id`, if any.
    #[must_use]
    pub fn draft_by_entity_id(&self, entity_id: EntityId) -> Option<&DraftEntity> {
        self.draft
            .values()
            .find(|draft| draft.entity_id == Some(entity_id))
    }
}

/// Builds a fresh [`EntityStore`] from an authoritative content tree, the
/// previous draft overlay, and preset draft-id assignments from a save
/// that just completed.
///
/// Per saved entity, the existing draft wins when its version is greater
/// than or equal to the saved version, so local edits are never silently
/// discarded on a tie. Draft rows without a matching saved entity (local
/// content not yet saved) are carried over unchanged, except that presets
/// may attach their freshly assigned entity ids.
pub fn create_entity_store(
    contents: &[SavedEntity],
    draft_data: &HashMap<DraftId, DraftEntity>,
    preset_draft_ids: &HashMap<DraftId, EntityId>,
) -> StoreResult<EntityStore> {
    // Step 1: entity id -> draft id, presets seeded first so that an
    // existing draft row claiming the same entity wins, fresh ids for
    // saved entities nobody mapped yet.
    let mut entity_to_draft: HashMap<EntityId, DraftId> = HashMap::new();
    for (draft_id, entity_id) in preset_draft_ids {
        entity_to_draft.insert(*entity_id, draft_id.clone());
    }
    for (draft_id, draft) in draft_data {
        if let Some(entity_id) = draft.entity_id {
            entity_to_draft.insert(entity_id, draft_id.clone());
        }
    }
    for saved in iter_tree(contents) {
        entity_to_draft
            .entry(saved.entity_id)
            .or_insert_with(DraftId::generate);
    }

    let mut store = EntityStore::default();

    // Step 2 and 3: one draft row per saved entity, version deciding which
    // side wins, block children re-linked by draft id.
    for saved in iter_tree(contents) {
        store.saved.insert(saved.entity_id, saved.clone());

        let draft_id = entity_to_draft
            .get(&saved.entity_id)
            .cloned()
            .unwrap_or_else(DraftId::generate);
        let existing = draft_data.get(&draft_id);

        let mut row = match existing {
            Some(draft) if draft.merge_version() >= saved.entity_version => draft.clone(),
            _ => DraftEntity {
                draft_id: draft_id.clone(),
                entity_id: None,
                entity_type_id: saved.entity_type_id.clone(),
                entity_version: Some(saved.entity_version),
                properties: saved.properties.clone(),
                component_id: saved.component_id.clone(),
                block_child_draft_id: None,
            },
        };
        row.draft_id = draft_id.clone();
        row.entity_id = Some(saved.entity_id);
        if let Some(child) = &saved.block_child {
            row.block_child_draft_id = entity_to_draft.get(&child.entity_id).cloned();
        }
        store.draft.insert(draft_id, row);
    }

    // Step 4: local-only drafts carry over, substituting preset entity ids.
    for (draft_id, draft) in draft_data {
        if store.draft.contains_key(draft_id) {
            continue;
        }
        let mut row = draft.clone();
        if row.entity_id.is_none()
            && let Some(entity_id) = preset_draft_ids.get(draft_id)
        {
            row.entity_id = Some(*entity_id);
        }
        store.draft.insert(draft_id.clone(), row);
    }

    // Step 5: every preset must land on an existing row, and entity ids
    // are write-once.
    for (draft_id, entity_id) in preset_draft_ids {
        let row = store
            .draft
            .get_mut(draft_id)
            .ok_or_else(|| StoreError::MissingDraft(draft_id.clone()))?;
        match row.entity_id {
            None => row.entity_id = Some(*entity_id),
            Some(existing) if existing == *entity_id => {}
            Some(existing) => {
                return Err(StoreError::EntityIdConflict {
                    draft_id: draft_id.clone(),
                    existing,
                    assigned: *entity_id,
                });
            }
        }
    }

    debug!(
        saved = store.saved.len(),
        drafts = store.draft.len(),
        "reconciled entity store"
    );
    Ok(store)
}

/// Every node of the content tree, parents before their block children.
fn iter_tree(contents: &[SavedEntity]) -> impl Iterator<Item = &SavedEntity> {
    let mut nodes = Vec::new();
    let mut stack: Vec<&SavedEntity> = contents.iter().rev().collect();
    while let Some(node) = stack.pop() {
        nodes.push(node);
        if let Some(child) = &node.block_child {
            stack.push(child.as_ref());
        }
    }
    nodes.into_iter()
}
