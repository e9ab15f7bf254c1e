//! Integration tests for health probes and request ids.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_app_with_gateway, create_test_app, get_request, parse_response_body};
use domain::services::UnconfiguredGateway;
use std::sync::Arc;
use tower::ServiceExt;
use wedding_site_api::middleware::REQUEST_ID_HEADER;

#[tokio::test]
async fn test_health_with_store() {
    let (app, _gateway) = create_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["event_id"], "test-wedding");
    assert_eq!(body["data_store"]["connected"], true);
}

#[tokio::test]
async fn test_health_without_store_is_degraded() {
    let app = create_app_with_gateway(Arc::new(UnconfiguredGateway));

    let response = app
        .clone()
        .oneshot(get_request("/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["data_store"]["configured"], false);

    let response = app
        .clone()
        .oneshot(get_request("/api/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(get_request("/api/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _gateway) = create_test_app();

    let request = Request::builder()
        .uri("/api/health/live")
        .header("X-Request-ID", "wedding-req-42")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "wedding-req-42"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _gateway) = create_test_app();

    let response = app.oneshot(get_request("/api/health/live")).await.unwrap();

    let id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _gateway) = create_test_app();

    let response = app.oneshot(get_request("/api/v1/nope")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
