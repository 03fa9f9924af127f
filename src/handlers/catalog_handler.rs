// src/handlers/catalog_handler.rs
use axum::Json;

use crate::models::catalog::{service_type_entries, ServiceTypeEntry, VEHICLE_BRANDS};

pub async fn service_types() -> Json<Vec<ServiceTypeEntry>> {
    Json(service_type_entries())
}

pub async fn vehicle_brands() -> Json<&'static [&'static str]> {
    Json(VEHICLE_BRANDS)
}
