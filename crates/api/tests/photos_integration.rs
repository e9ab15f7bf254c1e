//! Integration tests for photo contributions.

mod common;

use axum::http::{Method, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{create_app_with_gateway, create_test_app, json_request, parse_response_body};
use domain::services::UnconfiguredGateway;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn image(file_name: &str) -> Value {
    json!({
        "file_name": file_name,
        "content_type": "image/jpeg",
        "data_base64": STANDARD.encode(format!("jpeg:{}", file_name)),
    })
}

fn upload(contributor: Option<&str>, files: Vec<Value>) -> axum::http::Request<axum::body::Body> {
    json_request(
        Method::POST,
        "/api/v1/photos",
        json!({ "contributor": contributor, "files": files }),
    )
}

#[tokio::test]
async fn test_batch_is_committed() {
    let (app, gateway) = create_test_app();

    let response = app
        .oneshot(upload(
            Some("Tante Erika"),
            vec![image("dance.jpg"), image("cake.jpg")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["committed"].as_array().unwrap().len(), 2);
    assert_eq!(body["committed"][0]["contributor"], "Tante Erika");
    assert!(body["rejected"].as_array().unwrap().is_empty());
    assert!(body["failed"].as_array().unwrap().is_empty());

    assert_eq!(gateway.photo_contributions().len(), 2);
    assert_eq!(gateway.stored_media(), 2);
}

#[tokio::test]
async fn test_contributor_is_required() {
    let (app, gateway) = create_test_app();

    let response = app
        .oneshot(upload(None, vec![image("dance.jpg")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "contributor");
    assert_eq!(gateway.upload_calls(), 0);
    assert!(gateway.photo_contributions().is_empty());
}

#[tokio::test]
async fn test_invalid_files_do_not_block_valid_ones() {
    let (app, gateway) = create_test_app();

    let files = vec![
        image("dance.jpg"),
        json!({ "file_name": "notes.txt", "data_base64": STANDARD.encode("hello") }),
        json!({ "file_name": "broken.jpg", "data_base64": "%%%" }),
        json!({ "file_name": "empty.png", "data_base64": "" }),
    ];
    let response = app.oneshot(upload(Some("Ben"), files)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["committed"].as_array().unwrap().len(), 1);

    let rejected: Vec<&str> = body["rejected"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["file_name"].as_str().unwrap())
        .collect();
    assert_eq!(rejected.len(), 3);
    assert!(rejected.contains(&"notes.txt"));
    assert!(rejected.contains(&"broken.jpg"));
    assert!(rejected.contains(&"empty.png"));
    assert_eq!(gateway.photo_contributions().len(), 1);
}

#[tokio::test]
async fn test_batch_limit_rejects_extra_files() {
    let (app, gateway) = create_test_app();

    // Test config allows five files per batch.
    let files = (0..7).map(|i| image(&format!("photo-{}.jpg", i))).collect();
    let response = app.oneshot(upload(Some("Ben"), files)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["committed"].as_array().unwrap().len(), 5);
    assert_eq!(body["rejected"].as_array().unwrap().len(), 2);
    assert_eq!(gateway.photo_contributions().len(), 5);
}

#[tokio::test]
async fn test_nothing_acceptable_is_rejected() {
    let (app, gateway) = create_test_app();

    let response = app
        .oneshot(upload(
            Some("Ben"),
            vec![json!({ "file_name": "notes.txt", "data_base64": STANDARD.encode("hi") })],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.upload_calls(), 0);
}

#[tokio::test]
async fn test_empty_batch_is_rejected() {
    let (app, _gateway) = create_test_app();

    let response = app.oneshot(upload(Some("Ben"), vec![])).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_upload_is_retried_and_reported() {
    let (app, gateway) = create_test_app();
    gateway.set_upload_failure(|bytes| bytes == b"jpeg:cursed.jpg");

    let response = app
        .oneshot(upload(
            Some("Ben"),
            vec![image("dance.jpg"), image("cursed.jpg")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["committed"].as_array().unwrap().len(), 1);
    assert_eq!(body["failed"][0]["file_name"], "cursed.jpg");

    // Two uploads in the first round, one retry for the failed file.
    assert_eq!(gateway.upload_calls(), 3);
    assert_eq!(gateway.photo_contributions().len(), 1);
}

#[tokio::test]
async fn test_every_upload_failing_answers_502() {
    let (app, gateway) = create_test_app();
    gateway.set_upload_failure(|_| true);

    let response = app
        .oneshot(upload(Some("Ben"), vec![image("dance.jpg")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(gateway.photo_contributions().is_empty());
}

#[tokio::test]
async fn test_unconfigured_object_store_answers_503() {
    let app = create_app_with_gateway(Arc::new(UnconfiguredGateway));

    let response = app
        .oneshot(upload(Some("Ben"), vec![image("dance.jpg")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
