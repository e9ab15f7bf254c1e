//! Integration tests for the host dashboard, stats and CSV export.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    attending_rsvp, create_app_with_gateway, create_test_app, get_request, json_request,
    parse_response_body, response_text,
};
use domain::services::UnconfiguredGateway;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::json;
use shared::csv::split_row;
use std::sync::Arc;
use tower::ServiceExt;

async fn seed(app: &axum::Router) {
    for party_size in [2, 3] {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/rsvp",
                attending_rsvp(&name, &email, party_size),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/rsvp",
            json!({
                "name": "Müller, \"Hansi\"",
                "email": "hansi@example.com",
                "attendance": "declined",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_stats_count_attending_guests_only() {
    let (app, _gateway) = create_test_app();
    seed(&app).await;

    let response = app.oneshot(get_request("/api/v1/admin/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["attending"], 2);
    assert_eq!(body["declined"], 1);
    assert_eq!(body["pending"], 0);
    assert_eq!(body["total_guests"], 5);
    assert_eq!(body["photos"], 0);
}

#[tokio::test]
async fn test_dashboard_snapshot() {
    let (app, _gateway) = create_test_app();
    seed(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/guestbook",
            json!({ "name": "Julia", "message": "Congratulations!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get_request("/api/v1/admin/dashboard"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["responses"].as_array().unwrap().len(), 3);
    assert_eq!(body["guestbook"].as_array().unwrap().len(), 1);
    assert!(body["music_wishes"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["total_guests"], 5);
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn test_csv_export() {
    let (app, gateway) = create_test_app();
    seed(&app).await;

    let response = app
        .oneshot(get_request("/api/v1/admin/rsvps/export.csv"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("rsvps-test-wedding.csv"));

    let csv = response_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), gateway.guest_responses().len() + 1);
    assert_eq!(lines[0], "Name,Email,Status,Guests,Menu,Date");

    // Oldest first: the declined response was seeded last.
    let last = split_row(lines[3]).unwrap();
    assert_eq!(last[0], "Müller, \"Hansi\"");
    assert_eq!(last[2], "declined");
    assert_eq!(last[3], "0");
    assert_eq!(last[4], "");
}

#[tokio::test]
async fn test_empty_export_is_header_only() {
    let (app, _gateway) = create_test_app();

    let response = app
        .oneshot(get_request("/api/v1/admin/rsvps/export.csv"))
        .await
        .unwrap();

    assert_eq!(
        response_text(response).await,
        "Name,Email,Status,Guests,Menu,Date\n"
    );
}

#[tokio::test]
async fn test_dashboard_unconfigured() {
    let app = create_app_with_gateway(Arc::new(UnconfiguredGateway));

    let response = app
        .oneshot(get_request("/api/v1/admin/dashboard"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
