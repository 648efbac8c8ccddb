use pagegraph_types::{EntityId, Identifier, PlaceholderId, TypeIdentifier, VersionedUri};

// ── PlaceholderId ────────────────────────────────────────────────

#[test]
fn placeholder_id_requires_prefix() {
    assert!(PlaceholderId::parse("placeholder-abc").is_some());
    assert!(PlaceholderId::parse("abc").is_none());
}

#[test]
fn from_suffix_adds_prefix() {
    let id = PlaceholderId::from_suffix("block-1");
    assert_eq!(id.as_str(), "placeholder-block-1");
}

// ── Identifier classification ────────────────────────────────────

#[test]
fn parses_placeholder_by_prefix() {
    let id = Identifier::parse("placeholder-new-entity").unwrap();
    assert!(id.is_placeholder());
    assert!(id.as_real().is_none());
}

#[test]
fn parses_real_entity_id() {
    let entity_id = EntityId::new();
    let id = Identifier::parse(&entity_id.to_string()).unwrap();
    assert_eq!(id.as_real(), Some(&entity_id));
}

#[test]
fn rejects_strings_that_are_neither() {
    assert!(Identifier::parse("neither-a-uuid-nor-prefixed").is_err());
}

#[test]
fn type_identifier_parses_versioned_uri() {
    let id = TypeIdentifier::parse("https://pagegraph.dev/types/entity-type/page/v/1").unwrap();
    let uri = VersionedUri::parse("https://pagegraph.dev/types/entity-type/page/v/1").unwrap();
    assert_eq!(id.as_real(), Some(&uri));
}

// ── Serde (wire form is a plain string) ──────────────────────────

#[test]
fn serde_keeps_placeholder_text() {
    let id: Identifier = serde_json::from_str("\"placeholder-x\"").unwrap();
    assert!(id.is_placeholder());
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"placeholder-x\"");
}

#[test]
fn serde_roundtrips_real_ids() {
    let entity_id = EntityId::new();
    let json = format!("\"{entity_id}\"");
    let id: Identifier = serde_json::from_str(&json).unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), json);
}
