//! Placeholder registration and resolution.
//!
//! Earlier actions in a batch register the ids of the entities they create
//! under client-chosen placeholders; later actions reference those
//! placeholders instead of ids they cannot know yet. The map also records
//! registration order so the response can echo every assignment back.

use crate::error::ActionError;
use pagegraph_model::{EntityDefinition, ExistingEntity};
use pagegraph_types::{EntityId, Identifier, PlaceholderId, TypeIdentifier, VersionedUri};
use serde::{Deserialize, Serialize};

/// One placeholder assignment echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderPayload {
    pub placeholder_id: PlaceholderId,
    pub entity_id: EntityId,
}

/// Placeholder-to-id assignments accumulated over one batch, in
/// registration order.
#[derive(Debug, Default)]
pub struct PlaceholderResultsMap {
    entries: Vec<(PlaceholderId, EntityId)>,
}

impl PlaceholderResultsMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entity_id` under `placeholder`, when one was supplied.
    /// A placeholder registered twice keeps its first assignment.
    pub fn register(&mut self, placeholder: Option<&PlaceholderId>, entity_id: EntityId) {
        let Some(placeholder) = placeholder else {
            return;
        };
        if self.lookup(placeholder).is_none() {
            self.entries.push((placeholder.clone(), entity_id));
        }
    }

    fn lookup(&self, placeholder: &PlaceholderId) -> Option<EntityId> {
        self.entries
            .iter()
            .find(|(key, _)| key == placeholder)
            .map(|(_, id)| *id)
    }

    /// Resolves an entity id position: real ids pass through, placeholders
    /// must have been registered by an earlier action.
    pub fn resolve_entity(&self, identifier: &Identifier) -> Result<EntityId, ActionError> {
        match identifier {
            Identifier::Real(entity_id) => Ok(*entity_id),
            Identifier::Placeholder(placeholder) => self
                .lookup(placeholder)
                .ok_or_else(|| ActionError::MissingPlaceholder(placeholder.clone())),
        }
    }

    /// Resolves a type id position. No action in this vocabulary creates
    /// types, so a type placeholder can never have been registered.
    pub fn resolve_type(&self, identifier: &TypeIdentifier) -> Result<VersionedUri, ActionError> {
        match identifier {
            TypeIdentifier::Real(uri) => Ok(uri.clone()),
            TypeIdentifier::Placeholder(placeholder) => {
                Err(ActionError::MissingPlaceholder(placeholder.clone()))
            }
        }
    }

    /// Substitutes registered placeholders in the top level of a
    /// definition. Nested linked entities keep their own definitions
    /// untouched; they cannot reference placeholders.
    pub fn resolve_definition(
        &self,
        definition: &EntityDefinition,
    ) -> Result<EntityDefinition, ActionError> {
        let mut resolved = definition.clone();
        if let Some(existing) = &definition.existing_entity {
            resolved.existing_entity = Some(ExistingEntity {
                entity_id: Identifier::Real(self.resolve_entity(&existing.entity_id)?),
                owned_by_id: existing.owned_by_id,
            });
        }
        resolved.entity_type_ids = definition
            .entity_type_ids
            .iter()
            .map(|id| self.resolve_type(id).map(TypeIdentifier::Real))
            .collect::<Result<_, _>>()?;
        Ok(resolved)
    }

    /// Every assignment made so far, in registration order.
    #[must_use]
    pub fn results(&self) -> Vec<PlaceholderPayload> {
        self.entries
            .iter()
            .map(|(placeholder_id, entity_id)| PlaceholderPayload {
                placeholder_id: placeholder_id.clone(),
                entity_id: *entity_id,
            })
            .collect()
    }
}
