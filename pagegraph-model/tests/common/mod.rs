#![allow(dead_code)]

use pagegraph_client::{EntityTypeSchema, InMemoryGraph, LinkTypeSchema};
use pagegraph_model::system;
use pagegraph_types::{BaseUri, Properties, VersionedUri};
use serde_json::json;

/// An application-level entity type for test content.
pub fn note_entity_type_id() -> VersionedUri {
    VersionedUri::new(
        BaseUri::new("https://pagegraph.dev/types/entity-type/note/"),
        1,
    )
}

/// An application-level link type for test trees.
pub fn reference_link_type_id() -> VersionedUri {
    VersionedUri::new(
        BaseUri::new("https://pagegraph.dev/types/link-type/reference/"),
        1,
    )
}

pub fn text_property_base_uri() -> BaseUri {
    BaseUri::new("https://pagegraph.dev/types/property-type/text/")
}

pub fn note_properties(text: &str) -> Properties {
    Properties::new().with_property(text_property_base_uri(), json!(text))
}

/// A graph with the system ontology plus the test types registered.
pub async fn seeded_graph() -> InMemoryGraph {
    let graph = InMemoryGraph::new();
    for (id, title) in [
        (system::block_entity_type_id(), "Block"),
        (system::page_entity_type_id(), "Page"),
        (note_entity_type_id(), "Note"),
    ] {
        graph
            .register_entity_type(EntityTypeSchema {
                entity_type_id: id,
                title: title.to_owned(),
            })
            .await;
    }
    for (id, title) in [
        (system::block_data_link_type_id(), "Block Data"),
        (system::contents_link_type_id(), "Contents"),
        (system::parent_link_type_id(), "Parent"),
        (reference_link_type_id(), "Reference"),
    ] {
        graph
            .register_link_type(LinkTypeSchema {
                link_type_id: id,
                title: title.to_owned(),
            })
            .await;
    }
    graph
}
