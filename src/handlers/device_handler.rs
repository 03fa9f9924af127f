// src/handlers/device_handler.rs
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::{
    errors::{CarCareError as AppError, CarCareResult},
    models::user::DeviceRegistration,
    state::AppState,
};

fn validate(registration: &DeviceRegistration) -> CarCareResult<()> {
    if registration.user_id.trim().is_empty() {
        return Err(AppError::validation_error("user_id", "User id must not be empty"));
    }
    if registration.token.trim().is_empty() {
        return Err(AppError::validation_error("token", "Device token must not be empty"));
    }
    Ok(())
}

pub async fn register_device(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<DeviceRegistration>,
) -> CarCareResult<StatusCode> {
    validate(&registration)?;
    state
        .devices
        .register(&registration.user_id, &registration.token)
        .await?;
    tracing::info!("Device registered for user: {}", registration.user_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unregister_device(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<DeviceRegistration>,
) -> CarCareResult<StatusCode> {
    validate(&registration)?;
    state
        .devices
        .unregister(&registration.user_id, &registration.token)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::handlers::{router, test_support::*};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_register_and_unregister() {
        let (state, _) = test_state();
        let body = json!({"user_id": "u1", "token": "tok-1"});

        let (status, _) = send(router(state.clone()), Method::POST, "/devices", Some(body.clone())).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.devices.tokens_for("u1").await.unwrap(), vec!["tok-1"]);

        let (status, _) = send(router(state.clone()), Method::DELETE, "/devices", Some(body)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.devices.tokens_for("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let (state, _) = test_state();
        let (status, body) = send(
            router(state),
            Method::POST,
            "/devices",
            Some(json!({"user_id": "u1", "token": " "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["details"][0]["field"], "token");
    }
}
