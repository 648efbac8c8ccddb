//! Entity definitions and linked-tree creation.
//!
//! A mutation can describe a whole tree of entities in one nested
//! definition. Creation flattens the tree, resolves or creates every node
//! with bounded concurrency, and only then wires up the links — a join
//! barrier between the two phases. There is no rollback: a failure partway
//! through leaves earlier creations persisted.

use crate::entity::{Entity, TypeCache};
use crate::error::{ModelError, ModelResult};
use crate::link::{CreateLink, Link};
use futures::stream::{self, StreamExt, TryStreamExt};
use pagegraph_client::GraphApi;
use pagegraph_types::{
    AccountId, Identifier, MaybePlaceholder, Properties, TypeIdentifier, VersionedUri,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on concurrent entity creations for one tree, so one large
/// definition cannot flood the graph service.
const TREE_CREATE_CONCURRENCY: usize = 8;

/// Reference to an entity that already exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingEntity {
    pub entity_id: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_by_id: Option<AccountId>,
}

/// How to obtain one entity: either a reference to an existing one, or
/// properties plus exactly one type identifier. Id positions may hold
/// placeholders on the wire; the model layer requires them resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_entity: Option<ExistingEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_type_ids: Vec<TypeIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_entities: Vec<LinkedEntityDefinition>,
}

/// A child definition plus the link that should point at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntityDefinition {
    pub link_type_id: VersionedUri,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    pub entity: EntityDefinition,
}

/// Link metadata recorded while flattening: which earlier node is the
/// parent, and how to link to it.
#[derive(Debug, Clone, PartialEq)]
struct ParentLink {
    parent_index: usize,
    link_type_id: VersionedUri,
    index: Option<i32>,
}

/// One node of the flattened tree.
#[derive(Debug, Clone, PartialEq)]
struct FlattenedEntry {
    definition: EntityDefinition,
    link: Option<ParentLink>,
}

/// Requires a resolved identifier; placeholders must have been substituted
/// by the batch layer before reaching the models.
pub(crate) fn require_real<T: Clone>(
    id: &MaybePlaceholder<T>,
    context: &str,
) -> ModelResult<T> {
    match id {
        MaybePlaceholder::Real(id) => Ok(id.clone()),
        MaybePlaceholder::Placeholder(placeholder) => Err(ModelError::InvalidInput(format!(
            "unresolved placeholder {placeholder} in {context}"
        ))),
    }
}

/// Depth-first, root-first flattening. Every node records its parent by
/// flattened index, so links can be created after all entities exist.
fn flatten_entity_tree(root: EntityDefinition) -> Vec<FlattenedEntry> {
    let mut entries = Vec::new();
    flatten_into(&mut entries, root, None);
    entries
}

fn flatten_into(
    entries: &mut Vec<FlattenedEntry>,
    mut definition: EntityDefinition,
    link: Option<ParentLink>,
) {
    let children = std::mem::take(&mut definition.linked_entities);
    entries.push(FlattenedEntry { definition, link });
    let parent_index = entries.len() - 1;
    for child in children {
        flatten_into(
            entries,
            child.entity,
            Some(ParentLink {
                parent_index,
                link_type_id: child.link_type_id,
                index: child.index,
            }),
        );
    }
}

/// Creates a root entity plus a tree of linked entities.
///
/// Entities are resolved or created first, siblings concurrently up to
/// [`TREE_CREATE_CONCURRENCY`]; links are created only after every entity
/// exists. For a definition with N linked entities this makes N+1 entities
/// and N links, each link outgoing from its declared parent.
pub async fn create_entity_with_links(
    api: &dyn GraphApi,
    owned_by_id: AccountId,
    entity_type_id: VersionedUri,
    properties: Properties,
    linked_entities: Vec<LinkedEntityDefinition>,
    actor_id: AccountId,
) -> ModelResult<Entity> {
    let root = EntityDefinition {
        existing_entity: None,
        entity_type_ids: vec![TypeIdentifier::Real(entity_type_id)],
        entity_properties: Some(properties),
        linked_entities,
    };
    let entries = flatten_entity_tree(root);
    debug!(nodes = entries.len(), "creating entity tree");

    // Phase one: every node independently, order of completion unspecified.
    // `buffered` keeps result order aligned with the flattened indices.
    let entities: Vec<(Option<ParentLink>, Entity)> = stream::iter(entries)
        .map(|entry| async move {
            let entity =
                Entity::get_or_create(api, owned_by_id, &entry.definition, actor_id).await?;
            Ok::<_, ModelError>((entry.link, entity))
        })
        .buffered(TREE_CREATE_CONCURRENCY)
        .try_collect()
        .await?;

    let root_entity = entities
        .first()
        .map(|(_, entity)| entity.clone())
        .ok_or_else(|| ModelError::Internal("could not create entity tree".to_owned()))?;

    // Phase two: links, after the join barrier above.
    let cache = TypeCache::new();
    for (link, entity) in &entities {
        let Some(link) = link else { continue };
        let (_, parent) = entities.get(link.parent_index).ok_or_else(|| {
            ModelError::Internal(format!(
                "flattened tree references missing parent {}",
                link.parent_index
            ))
        })?;
        let link_type = cache.link_type(api, &link.link_type_id).await?;
        Link::create(
            api,
            CreateLink {
                source_entity_id: parent.entity_id,
                target_entity_id: entity.entity_id,
                link_type,
                index: link.index,
                owned_by_id,
                actor_id,
            },
        )
        .await?;
    }

    Ok(root_entity)
}
