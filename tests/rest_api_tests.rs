//! End-to-end tests for the generated HTTP surface
//!
//! Two resources are wired against the in-memory store: `event` (UUID ids,
//! filter endpoint, primary field) and `note` (sequence ids, no filters).

use axum::http::StatusCode;
use axum_test::TestServer;
use crudgen::prelude::*;
use serde_json::Value;

fn event_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("date", FieldType::Str, FieldRole::Primary),
        FieldSpec::new("organizer", FieldType::Str, FieldRole::Required),
        FieldSpec::new("status", FieldType::Str, FieldRole::Required),
        FieldSpec::new("max_attendees", FieldType::Int, FieldRole::Required),
        FieldSpec::new("joiners", FieldType::List, FieldRole::Optional).with_default(json!([])),
    ]
}

fn event_shape() -> RequestShape {
    RequestShape::new(vec![
        FieldSpec::new("date", FieldType::Str, FieldRole::Required),
        FieldSpec::new("organizer", FieldType::Object, FieldRole::Required),
        FieldSpec::new("status", FieldType::Str, FieldRole::Required),
        FieldSpec::new("max_attendees", FieldType::Int, FieldRole::Required),
        FieldSpec::new("joiners", FieldType::List, FieldRole::Optional),
    ])
}

fn event_filters() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("date", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("organizer", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("status", FieldType::Str, FieldRole::Optional).with_default(""),
        FieldSpec::new("event_type", FieldType::Str, FieldRole::Optional).with_default(""),
    ]
}

fn test_server() -> TestServer {
    let store = InMemoryStore::new()
        .with_table(TableSchema::new("event", IdKind::Uuid, event_fields()))
        .with_table(TableSchema::new(
            "note",
            IdKind::Sequence,
            vec![FieldSpec::new("label", FieldType::Str, FieldRole::Required)],
        ));

    let mut api = CrudApi::new(Arc::new(store));
    api.register_resource(ResourceDef::new("event", event_shape()).with_filters(event_filters()))
        .expect("event should register");
    api.register_resource(ResourceDef::new(
        "note",
        RequestShape::new(vec![FieldSpec::new("label", FieldType::Str, FieldRole::Required)]),
    ))
    .expect("note should register");
    api.publish();

    TestServer::try_new(api.into_router()).expect("server should build")
}

fn sample_event() -> Value {
    json!({
        "date": "2024-01-01",
        "organizer": {"email": "a@b.com"},
        "status": "open",
        "max_attendees": 10,
    })
}

#[tokio::test]
async fn test_list_is_empty_initially() {
    let server = test_server();
    let response = server.get("/events").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_create_returns_created_entity() {
    let server = test_server();
    let response = server.post("/event").json(&sample_event()).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    let entity = &body["created_entity"];

    // submitted fields round-trip into the serialized entity
    for (key, value) in sample_event().as_object().unwrap() {
        assert_eq!(&entity[key], value, "field {key} should round-trip");
    }
    // a generated id and the defaulted optional field come back too
    Uuid::parse_str(entity["id"].as_str().expect("id should be a string"))
        .expect("id should be a uuid");
    assert_eq!(entity["joiners"], json!([]));
}

#[tokio::test]
async fn test_created_record_appears_in_list() {
    let server = test_server();
    server.post("/event").json(&sample_event()).await;

    let listed: Value = server.get("/events").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["status"], json!("open"));
}

#[tokio::test]
async fn test_get_by_id_returns_serialized_record() {
    let server = test_server();
    let created: Value = server.post("/event").json(&sample_event()).await.json();
    let id = created["created_entity"]["id"].as_str().unwrap().to_string();

    let response = server.get(&format!("/event/single/{id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["date"], json!("2024-01-01"));
}

#[tokio::test]
async fn test_get_missing_id_is_404() {
    let server = test_server();
    let response = server.get("/event/single/nope").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_filter_matches_populated_fields() {
    let server = test_server();
    server.post("/event").json(&sample_event()).await;
    let mut closed = sample_event();
    closed["date"] = json!("2024-02-01");
    closed["status"] = json!("closed");
    server.post("/event").json(&closed).await;

    let matched: Value = server
        .get("/events/filter")
        .add_query_param("status", "open")
        .await
        .json();
    let matched = matched.as_array().unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["date"], json!("2024-01-01"));
}

#[tokio::test]
async fn test_filter_with_all_defaults_equals_list() {
    let server = test_server();
    server.post("/event").json(&sample_event()).await;
    let mut second = sample_event();
    second["date"] = json!("2024-02-01");
    server.post("/event").json(&second).await;

    let unfiltered: Value = server.get("/events").await.json();
    let defaulted: Value = server
        .get("/events/filter")
        .add_query_param("status", "")
        .add_query_param("date", "")
        .add_query_param("organizer", "")
        .add_query_param("event_type", "")
        .await
        .json();
    assert_eq!(defaulted, unfiltered);
    assert_eq!(defaulted.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_filter_endpoint_absent_without_filter_specs() {
    let server = test_server();
    let response = server.get("/notes/filter").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_create_missing_required_field_is_422() {
    let server = test_server();
    let response = server
        .post("/event")
        .json(&json!({"date": "2024-01-01", "organizer": {"email": "a@b.com"}}))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    let fields: Vec<&str> = body["details"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"status"));
    assert!(fields.contains(&"max_attendees"));
}

#[tokio::test]
async fn test_create_wrong_type_is_422() {
    let server = test_server();
    let mut body = sample_event();
    body["max_attendees"] = json!("ten");
    let response = server.post("/event").json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_duplicate_primary_field_declined() {
    let server = test_server();
    server.post("/event").json(&sample_event()).await;

    let response = server.post("/event").json(&sample_event()).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"success": false}));
}

#[tokio::test]
async fn test_update_replaces_record() {
    let server = test_server();
    let created: Value = server.post("/event").json(&sample_event()).await.json();
    let id = created["created_entity"]["id"].as_str().unwrap().to_string();

    let mut updated = sample_event();
    updated["status"] = json!("closed");
    let response = server
        .put(&format!("/event/single/{id}"))
        .json(&updated)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["updated_entity"]["status"], json!("closed"));
    assert_eq!(body["updated_entity"]["id"], json!(id));

    let fetched: Value = server.get(&format!("/event/single/{id}")).await.json();
    assert_eq!(fetched["status"], json!("closed"));
}

#[tokio::test]
async fn test_update_missing_id_returns_success_false() {
    let server = test_server();
    let response = server
        .put("/event/single/nope")
        .json(&sample_event())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"success": false}));
}

#[tokio::test]
async fn test_delete_returns_deleted_id() {
    let server = test_server();
    let created: Value = server.post("/event").json(&sample_event()).await.json();
    let id = created["created_entity"]["id"].as_str().unwrap().to_string();

    let response = server.delete(&format!("/event/single/{id}")).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["deleted_id"], json!(id));

    // a second delete finds nothing
    let again: Value = server.delete(&format!("/event/single/{id}")).await.json();
    assert_eq!(again, json!({"success": false}));
}

#[tokio::test]
async fn test_delete_all_returns_removed_count() {
    let server = test_server();
    server.post("/event").json(&sample_event()).await;
    let mut second = sample_event();
    second["date"] = json!("2024-02-01");
    server.post("/event").json(&second).await;

    let response = server.delete("/events").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!(2));
    assert_eq!(server.get("/events").await.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_numeric_id_string_is_coerced_to_int() {
    let server = test_server();
    let created: Value = server
        .post("/note")
        .json(&json!({"label": "first"}))
        .await
        .json();
    // sequence ids are integers
    assert_eq!(created["created_entity"]["id"], json!(1));

    // the digits-only path segment reaches the store as an integer id
    let fetched: Value = server.get("/note/single/1").await.json();
    assert_eq!(fetched["label"], json!("first"));

    let updated: Value = server
        .put("/note/single/1")
        .json(&json!({"label": "second"}))
        .await
        .json();
    assert_eq!(updated["updated_entity"]["label"], json!("second"));

    let deleted: Value = server.delete("/note/single/1").await.json();
    assert_eq!(deleted["deleted_id"], json!(1));
}

#[tokio::test]
async fn test_non_numeric_id_string_passes_through() {
    let server = test_server();
    server.post("/note").json(&json!({"label": "first"})).await;

    // "1x" is not digits-only, so it stays a text id and matches nothing
    let response = server.get("/note/single/1x").await;
    response.assert_status_not_found();

    let deleted: Value = server.delete("/note/single/1x").await.json();
    assert_eq!(deleted, json!({"success": false}));
}

#[tokio::test]
async fn test_health_routes() {
    let server = test_server();
    for path in ["/health", "/healthz"] {
        let body: Value = server.get(path).await.json();
        assert_eq!(body["status"], json!("ok"));
    }
}

#[tokio::test]
async fn test_resources_introspection() {
    let server = test_server();
    let body: Value = server.get("/resources").await.json();
    let resources = body.as_array().unwrap();
    assert_eq!(resources.len(), 2);

    let event = resources.iter().find(|r| r["name"] == json!("event")).unwrap();
    assert_eq!(event["plural"], json!("events"));
    assert_eq!(event["tags"], json!(["event"]));
    assert_eq!(event["filter"], json!(true));
    assert_eq!(event["attached"], json!(true));

    let note = resources.iter().find(|r| r["name"] == json!("note")).unwrap();
    assert_eq!(note["filter"], json!(false));
}
