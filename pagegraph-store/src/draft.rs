//! Draft identifiers and the two record shapes the store reconciles.

use pagegraph_types::{EntityId, EntityVersion, Properties, VersionedUri};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A locally generated identifier for one draft row, stable across
/// reconciliations. Entities that are not yet saved have a draft id but
/// no entity id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(String);

impl DraftId {
    /// Generates a fresh draft id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("draft-{}", Uuid::new_v4()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A server-confirmed entity as it appears in a fetched content tree.
/// Blocks carry their data entity nested as `block_child`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntity {
    pub entity_id: EntityId,
    pub entity_type_id: VersionedUri,
    pub entity_version: EntityVersion,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_child: Option<Box<SavedEntity>>,
}

/// One row of the draft overlay: a server-confirmed entity, local edits
/// on top of one, or locally created content with no entity id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntity {
    pub draft_id: DraftId,
    /// Absent until the entity has been saved; write-once after that.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    pub entity_type_id: VersionedUri,
    /// Absent for unsynced local content; treated as older than any
    /// server version when merging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<EntityVersion>,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Nested block data, referenced by draft id so the relationship
    /// survives entities that have no entity id yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_child_draft_id: Option<DraftId>,
}

impl DraftEntity {
    /// The version used for merge comparisons; unsynced drafts rank
    /// below every server version.
    #[must_use]
    pub fn merge_version(&self) -> EntityVersion {
        self.entity_version.unwrap_or(EntityVersion::MIN)
    }
}
