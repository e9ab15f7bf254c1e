//! Common test utilities for integration tests.
//!
//! The router is driven in-process over an [`InMemoryGateway`], so no
//! database or object store is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use domain::models::GiftItem;
use domain::services::{Gateway, InMemoryGateway};
use std::sync::Arc;
use wedding_site_api::{app::create_app, config::Config};

/// Test configuration: unconfigured database, four menu options, at most
/// five files of 1 MiB per batch.
pub fn test_config() -> Config {
    Config::load_for_test(&[]).expect("Failed to load test config")
}

pub fn test_gifts() -> Vec<GiftItem> {
    vec![
        GiftItem::available("espresso-machine", "Espresso machine").with_price("299€"),
        GiftItem::available("picnic-basket", "Picnic basket").with_price("65€"),
        GiftItem::available("honeymoon-dinner", "Honeymoon dinner"),
    ]
}

/// Router over a fresh in-memory gateway seeded with [`test_gifts`].
pub fn create_test_app() -> (Router, Arc<InMemoryGateway>) {
    let gateway = Arc::new(InMemoryGateway::new().with_gifts(test_gifts()));
    let app = create_app_with_gateway(gateway.clone());
    (app, gateway)
}

pub fn create_app_with_gateway(gateway: Arc<dyn Gateway>) -> Router {
    create_app(test_config(), gateway)
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// An attending RSVP body that passes every wizard guard.
pub fn attending_rsvp(name: &str, email: &str, party_size: u32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "attendance": "attending",
        "party_size": party_size,
        "menu": "Vegetarian",
    })
}
