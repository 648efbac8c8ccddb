//! Well-known system type URIs.
//!
//! Blocks and pages are ordinary entities distinguished by these types; the
//! model layer recognizes them by URI rather than by subclassing.

use pagegraph_types::{BaseUri, VersionedUri};

const NAMESPACE: &str = "https://pagegraph.dev/types/";

fn entity_type(slug: &str) -> VersionedUri {
    VersionedUri::new(BaseUri::new(format!("{NAMESPACE}entity-type/{slug}/")), 1)
}

fn link_type(slug: &str) -> VersionedUri {
    VersionedUri::new(BaseUri::new(format!("{NAMESPACE}link-type/{slug}/")), 1)
}

fn property_type(slug: &str) -> BaseUri {
    BaseUri::new(format!("{NAMESPACE}property-type/{slug}/"))
}

/// The block entity type.
#[must_use]
pub fn block_entity_type_id() -> VersionedUri {
    entity_type("block")
}

/// The page entity type.
#[must_use]
pub fn page_entity_type_id() -> VersionedUri {
    entity_type("page")
}

/// Link from a block to the entity holding its content.
#[must_use]
pub fn block_data_link_type_id() -> VersionedUri {
    link_type("block-data")
}

/// Link from a page to one of its blocks; indexed for ordering.
#[must_use]
pub fn contents_link_type_id() -> VersionedUri {
    link_type("contents")
}

/// Link from a page to its parent page.
#[must_use]
pub fn parent_link_type_id() -> VersionedUri {
    link_type("parent")
}

/// Identifies the renderer of a block.
#[must_use]
pub fn component_id_property_type_base_uri() -> BaseUri {
    property_type("component-id")
}

/// A page's title.
#[must_use]
pub fn title_property_type_base_uri() -> BaseUri {
    property_type("title")
}

/// A page's fractional ordering key among its siblings.
#[must_use]
pub fn index_property_type_base_uri() -> BaseUri {
    property_type("index")
}
