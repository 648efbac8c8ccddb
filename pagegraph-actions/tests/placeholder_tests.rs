use pagegraph_actions::{ActionError, PlaceholderResultsMap};
use pagegraph_model::{EntityDefinition, ExistingEntity};
use pagegraph_types::{
    BaseUri, EntityId, Identifier, PlaceholderId, TypeIdentifier, VersionedUri,
};
use pretty_assertions::assert_eq;

fn note_type() -> VersionedUri {
    VersionedUri::new(
        BaseUri::new("https://pagegraph.dev/types/entity-type/note/"),
        1,
    )
}

// ── registration / entity resolution ─────────────────────────────

#[test]
fn real_identifiers_pass_through_an_empty_map() {
    let map = PlaceholderResultsMap::new();
    let entity_id = EntityId::new();
    let resolved = map.resolve_entity(&Identifier::from(entity_id)).unwrap();
    assert_eq!(resolved, entity_id);
}

#[test]
fn registered_placeholder_resolves_to_its_entity() {
    let mut map = PlaceholderResultsMap::new();
    let placeholder = PlaceholderId::from_suffix("block-1");
    let entity_id = EntityId::new();
    map.register(Some(&placeholder), entity_id);

    let resolved = map
        .resolve_entity(&Identifier::Placeholder(placeholder))
        .unwrap();
    assert_eq!(resolved, entity_id);
}

#[test]
fn unregistered_placeholder_is_an_error() {
    let map = PlaceholderResultsMap::new();
    let placeholder = PlaceholderId::from_suffix("never-registered");
    let err = map
        .resolve_entity(&Identifier::Placeholder(placeholder.clone()))
        .unwrap_err();
    match err {
        ActionError::MissingPlaceholder(missing) => assert_eq!(missing, placeholder),
        other => panic!("expected MissingPlaceholder, got {other}"),
    }
}

#[test]
fn register_without_a_placeholder_records_nothing() {
    let mut map = PlaceholderResultsMap::new();
    map.register(None, EntityId::new());
    assert!(map.results().is_empty());
}

#[test]
fn first_assignment_wins_for_a_repeated_placeholder() {
    let mut map = PlaceholderResultsMap::new();
    let placeholder = PlaceholderId::from_suffix("dup");
    let first = EntityId::new();
    map.register(Some(&placeholder), first);
    map.register(Some(&placeholder), EntityId::new());

    let resolved = map
        .resolve_entity(&Identifier::Placeholder(placeholder))
        .unwrap();
    assert_eq!(resolved, first);
    assert_eq!(map.results().len(), 1);
}

#[test]
fn results_keep_registration_order() {
    let mut map = PlaceholderResultsMap::new();
    let ids: Vec<_> = (0..3).map(|_| EntityId::new()).collect();
    for (i, id) in ids.iter().enumerate() {
        map.register(Some(&PlaceholderId::from_suffix(&i.to_string())), *id);
    }

    let results = map.results();
    assert_eq!(
        results.iter().map(|r| r.entity_id).collect::<Vec<_>>(),
        ids
    );
    assert_eq!(
        results[0].placeholder_id,
        PlaceholderId::from_suffix("0")
    );
}

// ── type resolution ──────────────────────────────────────────────

#[test]
fn real_type_identifiers_pass_through() {
    let map = PlaceholderResultsMap::new();
    let resolved = map.resolve_type(&TypeIdentifier::from(note_type())).unwrap();
    assert_eq!(resolved, note_type());
}

#[test]
fn type_placeholders_never_resolve() {
    let mut map = PlaceholderResultsMap::new();
    // even an entity registration under the same name does not make a
    // type placeholder resolvable
    let placeholder = PlaceholderId::from_suffix("new-type");
    map.register(Some(&placeholder), EntityId::new());

    let err = map
        .resolve_type(&TypeIdentifier::Placeholder(placeholder))
        .unwrap_err();
    assert!(matches!(err, ActionError::MissingPlaceholder(_)));
}

// ── definition resolution ────────────────────────────────────────

#[test]
fn resolve_definition_substitutes_top_level_positions() {
    let mut map = PlaceholderResultsMap::new();
    let placeholder = PlaceholderId::from_suffix("earlier");
    let entity_id = EntityId::new();
    map.register(Some(&placeholder), entity_id);

    let definition = EntityDefinition {
        existing_entity: Some(ExistingEntity {
            entity_id: Identifier::Placeholder(placeholder),
            owned_by_id: None,
        }),
        entity_type_ids: vec![TypeIdentifier::from(note_type())],
        ..Default::default()
    };
    let resolved = map.resolve_definition(&definition).unwrap();

    assert_eq!(
        resolved.existing_entity.unwrap().entity_id,
        Identifier::from(entity_id)
    );
    assert_eq!(
        resolved.entity_type_ids,
        vec![TypeIdentifier::from(note_type())]
    );
}

#[test]
fn resolve_definition_fails_on_unknown_placeholders() {
    let map = PlaceholderResultsMap::new();
    let definition = EntityDefinition {
        existing_entity: Some(ExistingEntity {
            entity_id: Identifier::Placeholder(PlaceholderId::from_suffix("unknown")),
            owned_by_id: None,
        }),
        ..Default::default()
    };
    let err = map.resolve_definition(&definition).unwrap_err();
    assert!(matches!(err, ActionError::MissingPlaceholder(_)));
}
