//! Blueprint endpoint tests.

mod common;

use common::*;
use port_core::schema::{Blueprint, BlueprintProperty, ItemType, MirrorProperty};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};

fn blueprint_response(identifier: &str) -> serde_json::Value {
    json!({
        "ok": true,
        "blueprint": {
            "identifier": identifier,
            "title": "Service",
            "schema": {
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "required": []
            },
            "mirrorProperties": {
                "team_name": { "path": "owner.$title" }
            },
            "relations": {},
            "createdAt": "2024-01-02T03:04:05.000Z"
        }
    })
}

fn blueprint() -> Blueprint {
    let mut blueprint = Blueprint::new("service")
        .property("tags", BlueprintProperty::array_of(ItemType::String));
    blueprint.title = Some("Service".into());
    blueprint.mirror_properties.insert(
        "team_name".into(),
        MirrorProperty {
            title: None,
            path: "owner.$title".into(),
        },
    );
    blueprint
}

#[tokio::test]
async fn test_create_blueprint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/blueprints"))
        .and(body_partial_json(json!({
            "identifier": "service",
            "schema": { "properties": { "tags": { "type": "array", "items": { "type": "string" } } } },
            "mirrorProperties": { "team_name": { "path": "owner.$title" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(blueprint_response("service")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created = client.create_blueprint(&blueprint()).await.unwrap();
    assert_eq!(created.items_type("tags"), Some(ItemType::String));
    assert!(created.created_at.is_some());
}

#[tokio::test]
async fn test_update_blueprint_addresses_existing_identifier() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/blueprints/service"))
        .and(body_partial_json(json!({ "identifier": "microservice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(blueprint_response("microservice")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let renamed = Blueprint {
        identifier: "microservice".into(),
        ..blueprint()
    };
    let updated = client.update_blueprint("service", &renamed).await.unwrap();
    assert_eq!(updated.identifier, "microservice");
}

#[tokio::test]
async fn test_delete_blueprint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/blueprints/service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.delete_blueprint("service").await.unwrap();
}

#[tokio::test]
async fn test_delete_blueprint_with_entities_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/blueprints/service"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "ok": false,
            "error": "has_dependents",
            "message": "Blueprint still has entities"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.delete_blueprint("service").await.unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("Blueprint still has entities"));
}
