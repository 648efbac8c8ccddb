mod common;

use common::{note_entity_type_id, note_properties, seeded_graph, text_property_base_uri};
use pagegraph_actions::{
    ActionError, BatchError, CreateEntityAction, InsertBlockAction, MoveBlockAction,
    RemoveBlockAction, SwapBlockDataAction, UpdateEntityAction, UpdatePageAction,
    UpdatePageBatch,
};
use pagegraph_client::{GraphApi, InMemoryGraph};
use pagegraph_model::{
    CreateEntity, Entity, EntityDefinition, ExistingEntity, ModelError, Page,
};
use pagegraph_types::{
    AccountId, BaseUri, EntityId, Identifier, PlaceholderId, Properties, TypeIdentifier,
    VersionedUri,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn note_definition(text: &str) -> EntityDefinition {
    EntityDefinition {
        entity_type_ids: vec![TypeIdentifier::from(note_entity_type_id())],
        entity_properties: Some(note_properties(text)),
        ..Default::default()
    }
}

fn insert_block(text: &str, position: Option<i32>) -> UpdatePageAction {
    UpdatePageAction::InsertBlock(InsertBlockAction {
        owned_by_id: AccountId::new(),
        component_id: Some("https://example.com/text".to_owned()),
        existing_block_entity_id: None,
        entity: note_definition(text),
        block_placeholder_id: None,
        entity_placeholder_id: None,
        position,
    })
}

async fn execute(
    graph: &InMemoryGraph,
    actor: AccountId,
    page: &Page,
    actions: Vec<UpdatePageAction>,
) -> Result<pagegraph_actions::BatchOutcome, BatchError> {
    UpdatePageBatch {
        actor_id: actor,
        page_entity_id: page.entity().entity_id,
        actions,
    }
    .execute(graph)
    .await
}

async fn block_texts(graph: &InMemoryGraph, page: &Page) -> Vec<String> {
    let mut texts = Vec::new();
    for block in page.blocks(graph).await.unwrap() {
        let data = block.block_data(graph).await.unwrap();
        let text = data
            .properties
            .get(&text_property_base_uri())
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        texts.push(text.to_owned());
    }
    texts
}

// ── single actions ───────────────────────────────────────────────

#[tokio::test]
async fn create_entity_registers_its_placeholder() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let placeholder = PlaceholderId::from_suffix("note-1");

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::CreateEntity(CreateEntityAction {
            owned_by_id: actor,
            entity_placeholder_id: Some(placeholder.clone()),
            entity: note_definition("hello"),
        })],
    )
    .await
    .unwrap();

    assert_eq!(outcome.placeholders.len(), 1);
    assert_eq!(outcome.placeholders[0].placeholder_id, placeholder);
    let entity = Entity::get_latest(&graph, outcome.placeholders[0].entity_id)
        .await
        .unwrap();
    assert_eq!(
        entity.properties.get(&text_property_base_uri()),
        Some(&json!("hello"))
    );
}

#[tokio::test]
async fn insert_block_attaches_a_new_block_to_the_page() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();

    let outcome = execute(&graph, actor, &page, vec![insert_block("only", None)])
        .await
        .unwrap();

    assert_eq!(block_texts(&graph, &outcome.page).await, vec!["only"]);
}

#[tokio::test]
async fn insert_block_registers_block_and_data_placeholders() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let block_placeholder = PlaceholderId::from_suffix("block");
    let data_placeholder = PlaceholderId::from_suffix("data");

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::InsertBlock(InsertBlockAction {
            owned_by_id: actor,
            component_id: Some("https://example.com/text".to_owned()),
            existing_block_entity_id: None,
            entity: note_definition("x"),
            block_placeholder_id: Some(block_placeholder.clone()),
            entity_placeholder_id: Some(data_placeholder.clone()),
            position: None,
        })],
    )
    .await
    .unwrap();

    // data registers before the block it ends up wrapped in
    let names: Vec<_> = outcome
        .placeholders
        .iter()
        .map(|payload| payload.placeholder_id.clone())
        .collect();
    assert_eq!(names, vec![data_placeholder, block_placeholder]);

    let blocks = outcome.page.blocks(&graph).await.unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].entity().entity_id,
        outcome.placeholders[1].entity_id
    );
    assert_eq!(
        blocks[0].block_data(&graph).await.unwrap().entity_id,
        outcome.placeholders[0].entity_id
    );
}

#[tokio::test]
async fn insert_block_can_wrap_an_existing_entity() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let entity_type = graph.get_entity_type(&note_entity_type_id()).await.unwrap();
    let existing = Entity::create(
        &graph,
        CreateEntity {
            owned_by_id: actor,
            entity_type,
            properties: note_properties("existing"),
            entity_id: None,
            actor_id: actor,
        },
    )
    .await
    .unwrap();

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::InsertBlock(InsertBlockAction {
            owned_by_id: actor,
            component_id: Some("https://example.com/text".to_owned()),
            existing_block_entity_id: None,
            entity: EntityDefinition {
                existing_entity: Some(ExistingEntity {
                    entity_id: Identifier::from(existing.entity_id),
                    owned_by_id: None,
                }),
                ..Default::default()
            },
            block_placeholder_id: None,
            entity_placeholder_id: None,
            position: None,
        })],
    )
    .await
    .unwrap();

    let blocks = outcome.page.blocks(&graph).await.unwrap();
    assert_eq!(
        blocks[0].block_data(&graph).await.unwrap().entity_id,
        existing.entity_id
    );
}

#[tokio::test]
async fn insert_block_can_attach_an_existing_block_again() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let block_placeholder = PlaceholderId::from_suffix("block");

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![
            UpdatePageAction::InsertBlock(InsertBlockAction {
                owned_by_id: actor,
                component_id: Some("https://example.com/text".to_owned()),
                existing_block_entity_id: None,
                entity: note_definition("shared"),
                block_placeholder_id: Some(block_placeholder.clone()),
                entity_placeholder_id: None,
                position: None,
            }),
            UpdatePageAction::InsertBlock(InsertBlockAction {
                owned_by_id: actor,
                component_id: None,
                existing_block_entity_id: Some(Identifier::Placeholder(block_placeholder)),
                entity: note_definition("ignored"),
                block_placeholder_id: None,
                entity_placeholder_id: None,
                position: None,
            }),
        ],
    )
    .await
    .unwrap();

    // the same block is attached twice and keeps its original data
    let blocks = outcome.page.blocks(&graph).await.unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].entity().entity_id, blocks[1].entity().entity_id);
    assert_eq!(
        block_texts(&graph, &outcome.page).await,
        vec!["shared", "shared"]
    );
}

#[tokio::test]
async fn insert_block_rejects_both_a_component_and_an_existing_block() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();

    let err = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::InsertBlock(InsertBlockAction {
            owned_by_id: actor,
            component_id: Some("https://example.com/text".to_owned()),
            existing_block_entity_id: Some(Identifier::from(EntityId::new())),
            entity: note_definition("x"),
            block_placeholder_id: None,
            entity_placeholder_id: None,
            position: None,
        })],
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Action {
            source: ActionError::Model(ModelError::InvalidInput(_)),
            ..
        }
    ));
}

#[tokio::test]
async fn insert_block_rejects_neither_a_component_nor_an_existing_block() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();

    let err = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::InsertBlock(InsertBlockAction {
            owned_by_id: actor,
            component_id: None,
            existing_block_entity_id: None,
            entity: note_definition("x"),
            block_placeholder_id: None,
            entity_placeholder_id: None,
            position: None,
        })],
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        BatchError::Action {
            source: ActionError::Model(ModelError::InvalidInput(_)),
            ..
        }
    ));
}

// ── placeholder flow across actions ──────────────────────────────

#[tokio::test]
async fn later_actions_see_entities_created_by_earlier_ones() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let placeholder = PlaceholderId::from_suffix("note");

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![
            UpdatePageAction::CreateEntity(CreateEntityAction {
                owned_by_id: actor,
                entity_placeholder_id: Some(placeholder.clone()),
                entity: note_definition("before"),
            }),
            UpdatePageAction::UpdateEntity(UpdateEntityAction {
                entity_id: Identifier::Placeholder(placeholder),
                properties: note_properties("after"),
            }),
        ],
    )
    .await
    .unwrap();

    let entity = Entity::get_latest(&graph, outcome.placeholders[0].entity_id)
        .await
        .unwrap();
    assert_eq!(
        entity.properties.get(&text_property_base_uri()),
        Some(&json!("after"))
    );
}

#[tokio::test]
async fn update_entity_merges_by_key_and_keeps_unnamed_properties() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let extra = BaseUri::new("https://pagegraph.dev/types/property-type/extra/");
    let entity_type = graph.get_entity_type(&note_entity_type_id()).await.unwrap();
    let entity = Entity::create(
        &graph,
        CreateEntity {
            owned_by_id: actor,
            entity_type,
            properties: Properties::new()
                .with_property(text_property_base_uri(), json!("before"))
                .with_property(extra.clone(), json!("kept")),
            entity_id: None,
            actor_id: actor,
        },
    )
    .await
    .unwrap();

    execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::UpdateEntity(UpdateEntityAction {
            entity_id: Identifier::from(entity.entity_id),
            properties: note_properties("after"),
        })],
    )
    .await
    .unwrap();

    let latest = Entity::get_latest(&graph, entity.entity_id).await.unwrap();
    assert_eq!(
        latest.properties.get(&text_property_base_uri()),
        Some(&json!("after"))
    );
    // a property the action did not name survives the update
    assert_eq!(latest.properties.get(&extra), Some(&json!("kept")));
}

#[tokio::test]
async fn swap_block_data_resolves_both_sides_through_placeholders() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let block_placeholder = PlaceholderId::from_suffix("block");
    let replacement_placeholder = PlaceholderId::from_suffix("replacement");

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![
            UpdatePageAction::InsertBlock(InsertBlockAction {
                owned_by_id: actor,
                component_id: Some("https://example.com/text".to_owned()),
                existing_block_entity_id: None,
                entity: note_definition("original"),
                block_placeholder_id: Some(block_placeholder.clone()),
                entity_placeholder_id: None,
                position: None,
            }),
            UpdatePageAction::CreateEntity(CreateEntityAction {
                owned_by_id: actor,
                entity_placeholder_id: Some(replacement_placeholder.clone()),
                entity: note_definition("replacement"),
            }),
            UpdatePageAction::SwapBlockData(SwapBlockDataAction {
                block_entity_id: Identifier::Placeholder(block_placeholder),
                new_entity_entity_id: Identifier::Placeholder(replacement_placeholder),
            }),
        ],
    )
    .await
    .unwrap();

    assert_eq!(block_texts(&graph, &outcome.page).await, vec!["replacement"]);
}

#[tokio::test]
async fn reorder_and_remove_act_on_current_contents() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();

    let outcome = execute(
        &graph,
        actor,
        &page,
        vec![
            insert_block("a", None),
            insert_block("b", None),
            insert_block("c", None),
            // [a, b, c] -> [c, a, b] -> [c, b]
            UpdatePageAction::MoveBlock(MoveBlockAction {
                current_position: 2,
                new_position: 0,
            }),
            UpdatePageAction::RemoveBlock(RemoveBlockAction { position: 1 }),
        ],
    )
    .await
    .unwrap();

    assert_eq!(block_texts(&graph, &outcome.page).await, vec!["c", "b"]);
}

// ── failure behavior ─────────────────────────────────────────────

#[tokio::test]
async fn missing_page_fails_before_any_action_runs() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();

    let err = UpdatePageBatch {
        actor_id: actor,
        page_entity_id: EntityId::new(),
        actions: vec![insert_block("never", None)],
    }
    .execute(&graph)
    .await
    .unwrap_err();

    assert!(matches!(err, BatchError::Page(ModelError::NotFound(_))));
    assert_eq!(graph.entity_count().await, 0);
}

#[tokio::test]
async fn failing_action_reports_its_index_and_keeps_earlier_effects() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();
    let unknown_type = VersionedUri::new(
        BaseUri::new("https://pagegraph.dev/types/entity-type/unregistered/"),
        1,
    );

    let err = execute(
        &graph,
        actor,
        &page,
        vec![
            insert_block("kept", None),
            UpdatePageAction::CreateEntity(CreateEntityAction {
                owned_by_id: actor,
                entity_placeholder_id: None,
                entity: EntityDefinition {
                    entity_type_ids: vec![TypeIdentifier::from(unknown_type)],
                    entity_properties: Some(note_properties("doomed")),
                    ..Default::default()
                },
            }),
        ],
    )
    .await
    .unwrap_err();

    match err {
        BatchError::Action { index, .. } => assert_eq!(index, 1),
        other => panic!("expected an action error, got {other}"),
    }
    // the first action's block is still attached
    let page = Page::by_entity_id(&graph, page.entity().entity_id)
        .await
        .unwrap();
    assert_eq!(block_texts(&graph, &page).await, vec!["kept"]);
}

#[tokio::test]
async fn placeholder_used_before_registration_names_the_action() {
    let graph = seeded_graph().await;
    let actor = AccountId::new();
    let page = Page::create(&graph, actor, "p", actor).await.unwrap();

    let err = execute(
        &graph,
        actor,
        &page,
        vec![UpdatePageAction::UpdateEntity(UpdateEntityAction {
            entity_id: Identifier::Placeholder(PlaceholderId::from_suffix("later")),
            properties: note_properties("x"),
        })],
    )
    .await
    .unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.starts_with("action 0:"), "got: {rendered}");
    assert!(rendered.contains("placeholder-later"), "got: {rendered}");
}
