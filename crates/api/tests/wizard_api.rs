//! HTTP-level integration tests for wizard structure endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, editor_token, get_auth, post_json_auth, put_json_auth};
use formstep_core::editor::{EditCommand, EditOutcome, EditorMirror};
use formstep_core::tree::WizardTree;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_wizard(pool: &PgPool, token: &str, title: &str) -> String {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/wizards", json!({ "title": title }), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_step(pool: &PgPool, token: &str, wizard_id: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/wizards/{wizard_id}/steps"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn add_field(pool: &PgPool, token: &str, step_id: &str, body: Value) -> Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/steps/{step_id}/fields"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn fetch_tree(pool: &PgPool, token: &str, wizard_id: &str) -> WizardTree {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/wizards/{wizard_id}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_value(body_json(response).await["data"].clone()).unwrap()
}

fn step_numbers(tree: &WizardTree) -> Vec<i32> {
    tree.steps.iter().map(|s| s.step_number).collect()
}

// ---------------------------------------------------------------------------
// Wizards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_wizard_returns_201(pool: PgPool) {
    let token = editor_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/wizards",
        json!({ "title": "  Intake  ", "description": "New clients" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Intake");
    assert!(json["data"]["id"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_title_rejected(pool: PgPool) {
    let token = editor_token(&pool).await;
    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/wizards", json!({ "title": "   " }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_wizard_theme(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}"),
        json!({ "theme_color_primary": "#123abc", "font_family": "Inter" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Intake");
    assert_eq!(json["data"]["theme_color_primary"], "#123abc");
    assert_eq!(json["data"]["font_family"], "Inter");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}"),
        json!({ "theme_color_secondary": "blue" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}"),
        json!({ "logo_url": "not a url" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_wizards_newest_first(pool: PgPool) {
    let token = editor_token(&pool).await;
    create_wizard(&pool, &token, "First").await;
    create_wizard(&pool, &token, "Second").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/wizards", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_wizard_then_404(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Doomed").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/wizards/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/wizards/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/wizards/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_wizard_id_rejected(pool: PgPool) {
    let token = editor_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/wizards/12345", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_steps_number_sequentially_with_defaults(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;

    let first = add_step(&pool, &token, &id, json!({})).await;
    let second = add_step(&pool, &token, &id, json!({ "title": "Details" })).await;

    assert_eq!(first["step_number"], 1);
    assert_eq!(first["title"], "New Step");
    assert_eq!(second["step_number"], 2);

    let tree = fetch_tree(&pool, &token, &id).await;
    assert_eq!(step_numbers(&tree), vec![1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_step_number_conflicts(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    add_step(&pool, &token, &id, json!({ "step_number": 1 })).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps"),
        json!({ "step_number": 1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_number_past_the_end_rejected(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps"),
        json!({ "step_number": 7 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    add_step(&pool, &token, &id, json!({ "step_number": 1 })).await;
    add_step(&pool, &token, &id, json!({ "step_number": 2 })).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps"),
        json!({ "step_number": 4 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let tree = fetch_tree(&pool, &token, &id).await;
    assert_eq!(step_numbers(&tree), vec![1, 2]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_index_past_the_end_rejected(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let step_id = step["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/steps/{step_id}/fields"),
        json!({ "field_type": "toggle", "order_index": 3 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let field = add_field(
        &pool,
        &token,
        step_id,
        json!({ "field_type": "toggle", "order_index": 1 }),
    )
    .await;
    assert_eq!(field["order_index"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_step_for_missing_wizard_is_404(pool: PgPool) {
    let token = editor_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/wizards/{}/steps", uuid::Uuid::new_v4()),
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_steps(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let a = add_step(&pool, &token, &id, json!({ "title": "A" })).await;
    let b = add_step(&pool, &token, &id, json!({ "title": "B" })).await;
    let c = add_step(&pool, &token, &id, json!({ "title": "C" })).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps/order"),
        json!({ "step_ids": [c["id"], a["id"], b["id"]] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let tree = fetch_tree(&pool, &token, &id).await;
    let titles: Vec<&str> = tree.steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
    assert_eq!(step_numbers(&tree), vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_reorder_rejected_and_nothing_changes(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let a = add_step(&pool, &token, &id, json!({ "title": "A" })).await;
    add_step(&pool, &token, &id, json!({ "title": "B" })).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps/order"),
        json!({ "step_ids": [a["id"]] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let tree = fetch_tree(&pool, &token, &id).await;
    let titles: Vec<&str> = tree.steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_step_leaves_gap_until_compacted(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    add_step(&pool, &token, &id, json!({ "title": "A" })).await;
    let b = add_step(&pool, &token, &id, json!({ "title": "B" })).await;
    add_step(&pool, &token, &id, json!({ "title": "C" })).await;

    let mut mirror = EditorMirror::new(fetch_tree(&pool, &token, &id).await);
    let step_id = b["id"].as_str().unwrap().parse().unwrap();
    let ticket = mirror.apply(EditCommand::DeleteStep { step_id }).unwrap();
    assert_eq!(mirror.view().steps.len(), 2);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/steps/{step_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let confirmed = fetch_tree(&pool, &token, &id).await;
    assert_eq!(step_numbers(&confirmed), vec![1, 3]);
    mirror.reconcile(&ticket, EditOutcome::Confirmed(confirmed));
    assert_eq!(mirror.pending_count(), 0);

    let Some(EditCommand::ReorderSteps { ordered }) = mirror.compaction() else {
        panic!("expected a compaction reorder");
    };
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps/order"),
        json!({ "step_ids": &ordered }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let compacted = fetch_tree(&pool, &token, &id).await;
    assert_eq!(step_numbers(&compacted), vec![1, 2]);
    let ticket = mirror
        .apply(EditCommand::ReorderSteps { ordered })
        .unwrap();
    mirror.reconcile(&ticket, EditOutcome::Confirmed(compacted));
    assert!(mirror.compaction().is_none());
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dropdown_options_round_trip(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let step_id = step["id"].as_str().unwrap();

    let field = add_field(
        &pool,
        &token,
        step_id,
        json!({ "field_type": "dropdown", "label": "Size", "options": ["S", "M", "L"] }),
    )
    .await;
    assert_eq!(field["order_index"], 1);

    let tree = fetch_tree(&pool, &token, &id).await;
    let node = &tree.steps[0].fields[0];
    assert_eq!(
        node.options,
        Some(vec!["S".to_string(), "M".to_string(), "L".to_string()])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_field_defaults_and_legacy_text_alias(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let step_id = step["id"].as_str().unwrap();

    let field = add_field(&pool, &token, step_id, json!({ "field_type": "text" })).await;
    assert_eq!(field["field_type"], "text_input");
    assert_eq!(field["label"], "New Question");
    assert_eq!(field["required"], false);
    assert!(field["options"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_field_definitions_rejected(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let uri = format!("/api/v1/steps/{}/fields", step["id"].as_str().unwrap());

    for body in [
        json!({ "field_type": "checkbox" }),
        json!({ "field_type": "radio" }),
        json!({ "field_type": "radio", "options": [] }),
        json!({ "field_type": "dropdown", "options": ["A", "A"] }),
        json!({ "field_type": "dropdown", "options": ["A", " "] }),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, &uri, body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_field_validates_merged_definition(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let field = add_field(
        &pool,
        &token,
        step["id"].as_str().unwrap(),
        json!({ "field_type": "text_input", "label": "Name" }),
    )
    .await;
    let uri = format!("/api/v1/fields/{}", field["id"].as_str().unwrap());

    // Becoming a choice field needs options.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "field_type": "radio" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &uri,
        json!({ "field_type": "radio", "options": ["Yes", "No"], "required": true }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["label"], "Name");
    assert_eq!(json["data"]["options"], json!(["Yes", "No"]));
    assert_eq!(json["data"]["required"], true);

    // Leaving a choice type clears the options.
    let app = common::build_test_app(pool);
    let response = put_json_auth(app, &uri, json!({ "field_type": "long_text" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["options"].is_null());
    assert_eq!(json["data"]["required"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_and_delete_fields(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    let step = add_step(&pool, &token, &id, json!({})).await;
    let step_id = step["id"].as_str().unwrap();
    let a = add_field(&pool, &token, step_id, json!({ "field_type": "toggle", "label": "A" })).await;
    let b = add_field(&pool, &token, step_id, json!({ "field_type": "toggle", "label": "B" })).await;
    let c = add_field(&pool, &token, step_id, json!({ "field_type": "toggle", "label": "C" })).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/steps/{step_id}/fields/order"),
        json!({ "field_ids": [b["id"], c["id"], a["id"]] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/fields/{}", c["id"].as_str().unwrap()),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let tree = fetch_tree(&pool, &token, &id).await;
    let fields = &tree.steps[0].fields;
    let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["B", "A"]);
    let indexes: Vec<i32> = fields.iter().map(|f| f.order_index).collect();
    assert_eq!(indexes, vec![1, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mirror_drag_matches_server_order(pool: PgPool) {
    let token = editor_token(&pool).await;
    let id = create_wizard(&pool, &token, "Intake").await;
    for title in ["A", "B", "C"] {
        add_step(&pool, &token, &id, json!({ "title": title })).await;
    }

    let mut mirror = EditorMirror::new(fetch_tree(&pool, &token, &id).await);
    let command = mirror.move_step(0, 2).unwrap();
    let ticket = mirror.apply(command.clone()).unwrap();
    let optimistic: Vec<String> = mirror.view().steps.iter().map(|s| s.title.clone()).collect();
    assert_eq!(optimistic, vec!["B", "C", "A"]);

    let EditCommand::ReorderSteps { ordered } = command else {
        panic!("expected a step reorder");
    };
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/wizards/{id}/steps/order"),
        json!({ "step_ids": ordered }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let confirmed = fetch_tree(&pool, &token, &id).await;
    mirror.reconcile(&ticket, EditOutcome::Confirmed(confirmed.clone()));
    assert_eq!(mirror.view(), &confirmed);
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/api/v1/wizards", json!({ "title": "X" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_role_is_403(pool: PgPool) {
    let (_, token) = common::create_profile(&pool, formstep_core::roles::ROLE_CLIENT).await;
    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/wizards", json!({ "title": "X" }), &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_role_without_stored_profile_is_403(pool: PgPool) {
    // A valid admin token is not enough; the profile row decides.
    let token = common::token_for(uuid::Uuid::new_v4(), formstep_core::roles::ROLE_ADMIN);
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/wizards", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
