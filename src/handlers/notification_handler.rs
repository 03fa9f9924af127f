// src/handlers/notification_handler.rs
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    errors::{CarCareError, CarCareResult},
    models::{
        catalog::is_known_brand,
        notification::{NotificationPayload, OsNotification},
        request::{DispatchReport, DispatchRequest},
    },
    services::{click_router::resolve_destination, push_receiver::render_notification},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ResolvedDestination {
    pub destination: String,
}

pub async fn resolve(Json(raw): Json<serde_json::Value>) -> Json<ResolvedDestination> {
    let payload = NotificationPayload::from_json_lenient(raw);
    Json(ResolvedDestination {
        destination: resolve_destination(&payload.data),
    })
}

pub async fn render(Json(raw): Json<serde_json::Value>) -> Json<OsNotification> {
    let payload = NotificationPayload::from_json_lenient(raw);
    Json(render_notification(&payload))
}

pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DispatchRequest>,
) -> CarCareResult<Json<DispatchReport>> {
    let brand = &request.event.request().vehicle.brand;
    if !is_known_brand(brand) {
        return Err(CarCareError::validation_error(
            "request.vehicle.brand",
            format!("Unknown vehicle brand: {}", brand),
        ));
    }

    let report = state
        .notification_service
        .dispatch(&request.recipients, &request.event)
        .await?;
    Ok(Json(report))
}
