//! The link model.
//!
//! A link is a typed, ordered, directed edge between two entities. Links
//! are never updated in place: reordering or retargeting is modeled as a
//! logical removal plus a fresh creation.

use crate::entity::TypeCache;
use crate::error::ModelResult;
use pagegraph_client::{
    CreateLinkParams, Filter, GraphApi, LinkRecord, LinkTypeSchema, RemoveLinkParams,
};
use pagegraph_types::{AccountId, EntityId, VersionedUri};
use serde_json::json;
use std::cmp::Reverse;
use tracing::debug;

/// Parameters for [`Link::create`].
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub source_entity_id: EntityId,
    pub target_entity_id: EntityId,
    pub link_type: LinkTypeSchema,
    /// Explicit position among sibling links of the same type from the
    /// same source.
    pub index: Option<i32>,
    pub owned_by_id: AccountId,
    pub actor_id: AccountId,
}

/// A live link together with its resolved type schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    record: LinkRecord,
    link_type: LinkTypeSchema,
}

impl Link {
    /// Creates a link, making room first: siblings of the same type at or
    /// above an explicit index are shifted up by one, highest first, so no
    /// two siblings ever share an index.
    pub async fn create(api: &dyn GraphApi, params: CreateLink) -> ModelResult<Self> {
        if let Some(index) = params.index {
            let siblings =
                Self::by_source(api, params.source_entity_id, Some(&params.link_type)).await?;
            let mut colliding: Vec<&LinkRecord> = siblings
                .iter()
                .map(Self::record)
                .filter(|record| record.index.is_some_and(|i| i >= index))
                .collect();
            colliding.sort_by_key(|record| Reverse(record.index));
            if !colliding.is_empty() {
                debug!(
                    source = %params.source_entity_id,
                    count = colliding.len(),
                    "shifting sibling links to make room at index {index}"
                );
            }
            for record in colliding {
                Self::shift_up(api, record, params.actor_id).await?;
            }
        }
        Self::create_without_updating_siblings(api, params).await
    }

    /// Creates a link without the sibling-reindex pass. Used when ordering
    /// is irrelevant or the caller assigns indices itself.
    pub async fn create_without_updating_siblings(
        api: &dyn GraphApi,
        params: CreateLink,
    ) -> ModelResult<Self> {
        let record = api
            .create_link(CreateLinkParams {
                source_entity_id: params.source_entity_id,
                target_entity_id: params.target_entity_id,
                link_type_id: params.link_type.link_type_id.clone(),
                index: params.index,
                owned_by_id: params.owned_by_id,
                actor_id: params.actor_id,
            })
            .await?;
        Ok(Self {
            record,
            link_type: params.link_type,
        })
    }

    /// Live outgoing links of `source_entity_id`, optionally restricted to
    /// one type, ordered by index with unindexed links last.
    pub async fn by_source(
        api: &dyn GraphApi,
        source_entity_id: EntityId,
        link_type: Option<&LinkTypeSchema>,
    ) -> ModelResult<Vec<Self>> {
        let mut filters = vec![Filter::eq(
            ["source", "id"],
            json!(source_entity_id.to_string()),
        )];
        if let Some(link_type) = link_type {
            filters.push(Filter::eq(
                ["type", "versionedUri"],
                json!(link_type.link_type_id.to_string()),
            ));
        }
        let records = api.get_links_by_query(Filter::all(filters)).await?;

        let cache = TypeCache::new();
        let mut links = Vec::with_capacity(records.len());
        for record in records {
            let link_type = match link_type {
                Some(schema) => schema.clone(),
                None => cache.link_type(api, &record.link_type_id).await?,
            };
            links.push(Self { record, link_type });
        }
        links.sort_by_key(|link| (link.record.index.is_none(), link.record.index));
        Ok(links)
    }

    /// Logically removes this link.
    pub async fn remove(&self, api: &dyn GraphApi, actor_id: AccountId) -> ModelResult<()> {
        api.remove_link(RemoveLinkParams {
            source_entity_id: self.record.source_entity_id,
            target_entity_id: self.record.target_entity_id,
            link_type_id: self.record.link_type_id.clone(),
            index: self.record.index,
            actor_id,
        })
        .await?;
        Ok(())
    }

    /// Recreates one sibling with its index bumped by one.
    async fn shift_up(
        api: &dyn GraphApi,
        record: &LinkRecord,
        actor_id: AccountId,
    ) -> ModelResult<()> {
        api.remove_link(RemoveLinkParams {
            source_entity_id: record.source_entity_id,
            target_entity_id: record.target_entity_id,
            link_type_id: record.link_type_id.clone(),
            index: record.index,
            actor_id,
        })
        .await?;
        api.create_link(CreateLinkParams {
            source_entity_id: record.source_entity_id,
            target_entity_id: record.target_entity_id,
            link_type_id: record.link_type_id.clone(),
            index: record.index.map(|i| i + 1),
            owned_by_id: record.owned_by_id,
            actor_id,
        })
        .await?;
        Ok(())
    }

    /// The underlying wire record.
    #[must_use]
    pub const fn record(&self) -> &LinkRecord {
        &self.record
    }

    /// The resolved link type schema.
    #[must_use]
    pub const fn link_type(&self) -> &LinkTypeSchema {
        &self.link_type
    }

    /// The link type's versioned URI.
    #[must_use]
    pub const fn link_type_id(&self) -> &VersionedUri {
        &self.record.link_type_id
    }

    /// Source entity of the edge.
    #[must_use]
    pub const fn source_entity_id(&self) -> EntityId {
        self.record.source_entity_id
    }

    /// Target entity of the edge.
    #[must_use]
    pub const fn target_entity_id(&self) -> EntityId {
        self.record.target_entity_id
    }

    /// Ordering index among siblings, if any.
    #[must_use]
    pub const fn index(&self) -> Option<i32> {
        self.record.index
    }
}
