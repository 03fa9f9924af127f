// src/handlers/mod.rs
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub mod catalog_handler;
pub mod device_handler;
pub mod notification_handler;
pub mod redirect_handler;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/notifications/resolve", post(notification_handler::resolve))
        .route("/notifications/render", post(notification_handler::render))
        .route("/notifications/dispatch", post(notification_handler::dispatch))
        .route(
            "/devices",
            post(device_handler::register_device).delete(device_handler::unregister_device),
        )
        .route("/redirects/decide", post(redirect_handler::decide))
        .route("/routes/dashboard/:role", get(redirect_handler::dashboard_for_role))
        .route("/users/:uid/dashboard", get(redirect_handler::dashboard_for_user))
        .route("/users/:uid/role", put(redirect_handler::update_role))
        .route("/users/:uid/redirects", get(redirect_handler::redirect_stream))
        .route("/catalog/service-types", get(catalog_handler::service_types))
        .route("/catalog/vehicle-brands", get(catalog_handler::vehicle_brands))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
