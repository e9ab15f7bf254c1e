use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::Gateway;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{admin, gifts, guest_messages, health, photos, rsvp};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, gateway: Arc<dyn Gateway>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        gateway,
        config: config.clone(),
    };

    let cors = if config.server.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Guest-facing routes
    let guest_routes = Router::new()
        .route("/api/v1/rsvp", post(rsvp::submit_rsvp))
        .route("/api/v1/gifts", get(gifts::list_gifts))
        .route("/api/v1/gifts/:gift_id/reserve", post(gifts::reserve_gift))
        .route("/api/v1/photos", post(photos::upload_photos))
        .route(
            "/api/v1/guestbook",
            get(guest_messages::list_guestbook).post(guest_messages::sign_guestbook),
        )
        .route(
            "/api/v1/music-wishes",
            get(guest_messages::list_music_wishes).post(guest_messages::add_music_wish),
        );

    // Host-facing routes
    let admin_routes = Router::new()
        .route("/api/v1/admin/dashboard", get(admin::get_dashboard))
        .route("/api/v1/admin/stats", get(admin::get_stats))
        .route("/api/v1/admin/rsvps/export.csv", get(admin::export_rsvps_csv));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(guest_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
