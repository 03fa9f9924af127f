// src/handlers/redirect_handler.rs
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};

use crate::{
    errors::CarCareResult,
    models::user::{AuthSignals, AuthStatus, RoleUpdate},
    services::{
        profile_events::ProfileUpdated,
        redirect::{decide_redirect, RedirectOptions},
        route_table::{get_dashboard_route, ROLE_SELECTION_ROUTE},
    },
    state::AppState,
};

/// The client sends back the marker it got from the previous call.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    #[serde(default)]
    pub was_authenticated: bool,
    #[serde(default)]
    pub signals: AuthSignals,
    #[serde(default)]
    pub options: RedirectOptions,
}

#[derive(Debug, Serialize)]
pub struct DecideResponse {
    pub target: Option<String>,
    pub was_authenticated: bool,
    pub status: AuthStatus,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub route: String,
}

pub async fn decide(Json(request): Json<DecideRequest>) -> Json<DecideResponse> {
    let step = decide_redirect(request.was_authenticated, &request.signals, &request.options);
    Json(DecideResponse {
        target: step.target,
        was_authenticated: step.was_authenticated,
        status: AuthStatus::from(&request.signals),
    })
}

pub async fn dashboard_for_role(Path(role): Path<String>) -> Json<RouteResponse> {
    Json(RouteResponse {
        route: get_dashboard_route(&role).to_string(),
    })
}

/// Missing profiles and missing roles both land on role selection.
pub async fn dashboard_for_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> CarCareResult<Json<RouteResponse>> {
    let profile = state.profiles.get_profile(&uid).await?;
    let route = profile
        .as_ref()
        .and_then(|p| p.role_str())
        .map(get_dashboard_route)
        .unwrap_or(ROLE_SELECTION_ROUTE);

    if profile.is_none() {
        tracing::debug!("No profile for {}, sending to role selection", uid);
    }

    Ok(Json(RouteResponse { route: route.to_string() }))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    Json(update): Json<RoleUpdate>,
) -> CarCareResult<Json<RouteResponse>> {
    let profile = state.profiles.set_role(&uid, update.role.as_str()).await?;
    let listeners = state.profile_events.publish(ProfileUpdated {
        uid: uid.clone(),
        role: profile.role.clone(),
    });
    tracing::info!("Role for {} set to {}, {} listeners notified", uid, update.role, listeners);

    Ok(Json(RouteResponse {
        route: update.role.dashboard_route().to_string(),
    }))
}

pub async fn redirect_stream(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state
        .profile_events
        .redirects_for(uid)
        .map(|target| Ok(Event::default().event("redirect").data(target)));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use crate::handlers::{router, test_support::*};
    use crate::models::user::UserProfile;
    use axum::http::{Method, StatusCode};
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_decide_sign_out_once() {
        let (state, _) = test_state();

        let (status, body) = send(
            router(state.clone()),
            Method::POST,
            "/redirects/decide",
            Some(json!({"was_authenticated": true, "signals": {"authenticated": false}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "/");
        assert_eq!(body["was_authenticated"], false);

        let (_, body) = send(
            router(state),
            Method::POST,
            "/redirects/decide",
            Some(json!({"was_authenticated": false, "signals": {"authenticated": false}})),
        )
        .await;
        assert!(body["target"].is_null());
    }

    #[tokio::test]
    async fn test_decide_with_allow_list() {
        let (state, _) = test_state();
        let (_, body) = send(
            router(state),
            Method::POST,
            "/redirects/decide",
            Some(json!({
                "signals": {"authenticated": true, "profile": {"uid": "u1", "role": "Dealer"}},
                "options": {"allowed_roles": ["Mechanic"]}
            })),
        )
        .await;
        assert_eq!(body["target"], "/dashboard/dealer");
        assert_eq!(body["status"]["needs_role_selection"], false);
    }

    #[tokio::test]
    async fn test_dashboard_routes() {
        let (state, profiles) = test_state();
        profiles
            .insert(UserProfile { uid: "u1".into(), role: Some("Mechanic".into()), ..Default::default() })
            .await;

        let (_, body) = send(router(state.clone()), Method::GET, "/routes/dashboard/Dealer", None).await;
        assert_eq!(body["route"], "/dashboard/dealer");

        let (_, body) = send(router(state.clone()), Method::GET, "/users/u1/dashboard", None).await;
        assert_eq!(body["route"], "/dashboard/mechanic");

        let (status, body) = send(router(state), Method::GET, "/users/ghost/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "/auth/role-selection");
    }

    #[tokio::test]
    async fn test_update_role_notifies_subscribers() {
        let (state, profiles) = test_state();
        profiles.insert(UserProfile { uid: "u1".into(), ..Default::default() }).await;
        let mut redirects = Box::pin(state.profile_events.redirects_for("u1".into()));

        let (status, body) = send(
            router(state.clone()),
            Method::PUT,
            "/users/u1/role",
            Some(json!({"role": "CarOwner"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "/dashboard/car-owner");
        assert_eq!(redirects.next().await.as_deref(), Some("/dashboard/car-owner"));

        let (status, body) = send(router(state), Method::PUT, "/users/ghost/role", Some(json!({"role": "Dealer"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "user_not_found");
    }
}
