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

pub fn text_property_base_uri() -> BaseUri {
    BaseUri::new("https://pagegraph.dev/types/property-type/text/")
}

pub fn note_properties(text: &str) -> Properties {
    Properties::new().with_property(text_property_base_uri(), json!(text))
}

/// A graph with the system ontology plus the test types registered.
/// Set `RUST_LOG` to see the action layer's tracing output.
pub async fn seeded_graph() -> InMemoryGraph {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

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
