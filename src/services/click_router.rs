// src/services/click_router.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing;

use crate::models::notification::{
    ClickAction, NotificationAction, NotificationData, NotificationKind, NotificationPayload,
};
use crate::services::route_table::{
    owner_chat_route, owner_request_route, HOME_ROUTE, MECHANIC_REQUESTS_ROUTE,
};

#[derive(Debug, Error)]
pub enum ClientHostError {
    #[error("Could not enumerate clients: {0}")]
    Enumerate(String),

    #[error("Could not focus client {0}")]
    Focus(String),

    #[error("Could not open window at {0}")]
    OpenWindow(String),
}

/// An open tab or window the worker context can reach.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
    pub visible: bool,
}

/// Worker-to-window primitives: enumerate clients, focus one, open a new one.
#[async_trait]
pub trait ClientHost: Send + Sync {
    async fn match_all(&self) -> Result<Vec<WindowClient>, ClientHostError>;
    async fn focus(&self, client_id: &str) -> Result<(), ClientHostError>;
    async fn open_window(&self, url: &str) -> Result<(), ClientHostError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClickOutcome {
    Focused { client_id: String, destination: String },
    Opened { destination: String },
    Dismissed,
    Failed { destination: String, reason: String },
}

/// Fixed decision table from notification data to an in-app path.
/// Rows that need a request id fall through to home without one.
pub fn resolve_destination(data: &NotificationData) -> String {
    let request_id = data.request_id.as_deref();

    match (data.kind, data.action, request_id) {
        (Some(NotificationKind::RequestUpdate), Some(NotificationAction::ViewRequests), _) => {
            MECHANIC_REQUESTS_ROUTE.to_string()
        }
        (Some(NotificationKind::RequestUpdate), Some(NotificationAction::ViewRequest), Some(id)) => {
            owner_request_route(id)
        }
        (Some(NotificationKind::Diagnosis), _, Some(id)) => owner_request_route(id),
        (Some(NotificationKind::Message), _, Some(id)) => owner_chat_route(id),
        _ => {
            tracing::debug!(
                "No route for notification type={:?} action={:?} request_id={:?}",
                data.kind,
                data.action,
                request_id
            );
            HOME_ROUTE.to_string()
        }
    }
}

/// Picks the first visible client whose URL contains `destination`.
/// This is a substring test, so `/requests/4` also matches a tab on `/requests/42`.
pub fn find_matching_client<'a>(clients: &'a [WindowClient], destination: &str) -> Option<&'a WindowClient> {
    clients
        .iter()
        .find(|client| client.visible && client.url.contains(destination))
}

/// Routes a notification click: focus an existing tab on the destination,
/// otherwise open a new one. Never returns an error; host failures are
/// logged and reported in the outcome.
pub async fn handle_click(
    host: &dyn ClientHost,
    payload: &NotificationPayload,
    action: ClickAction,
) -> ClickOutcome {
    if action == ClickAction::Close {
        tracing::debug!("Notification dismissed");
        return ClickOutcome::Dismissed;
    }

    let destination = resolve_destination(&payload.data);

    let clients = match host.match_all().await {
        Ok(clients) => clients,
        Err(e) => {
            tracing::warn!("{}, opening a new window instead", e);
            Vec::new()
        }
    };

    if let Some(client) = find_matching_client(&clients, &destination) {
        tracing::info!("Focusing client {} for {}", client.id, destination);
        return match host.focus(&client.id).await {
            Ok(()) => ClickOutcome::Focused {
                client_id: client.id.clone(),
                destination,
            },
            Err(e) => {
                tracing::error!("{}", e);
                ClickOutcome::Failed { destination, reason: e.to_string() }
            }
        };
    }

    tracing::info!("Opening new window at {}", destination);
    match host.open_window(&destination).await {
        Ok(()) => ClickOutcome::Opened { destination },
        Err(e) => {
            tracing::error!("{}", e);
            ClickOutcome::Failed { destination, reason: e.to_string() }
        }
    }
}

/// Entry point for a raw click event: the notification's data as delivered
/// and the OS action id (empty for a click on the body).
pub async fn handle_click_event(host: &dyn ClientHost, raw: serde_json::Value, action_id: &str) -> ClickOutcome {
    let payload = NotificationPayload::from_json_lenient(raw);
    handle_click(host, &payload, ClickAction::from_action_id(action_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn data(value: serde_json::Value) -> NotificationData {
        NotificationPayload::from_json_lenient(json!({ "data": value })).data
    }

    #[derive(Default)]
    struct RecordingHost {
        clients: Vec<WindowClient>,
        fail_enumerate: bool,
        focused: Mutex<Vec<String>>,
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ClientHost for RecordingHost {
        async fn match_all(&self) -> Result<Vec<WindowClient>, ClientHostError> {
            if self.fail_enumerate {
                return Err(ClientHostError::Enumerate("worker shutting down".into()));
            }
            Ok(self.clients.clone())
        }

        async fn focus(&self, client_id: &str) -> Result<(), ClientHostError> {
            self.focused.lock().unwrap().push(client_id.to_string());
            Ok(())
        }

        async fn open_window(&self, url: &str) -> Result<(), ClientHostError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn client(id: &str, path: &str, visible: bool) -> WindowClient {
        WindowClient {
            id: id.to_string(),
            url: format!("https://carcare.app{}", path),
            visible,
        }
    }

    #[test]
    fn test_decision_table() {
        assert_eq!(
            resolve_destination(&data(json!({"type": "request_update", "action": "view_requests"}))),
            "/dashboard/mechanic/requests"
        );
        assert_eq!(
            resolve_destination(&data(json!({"type": "request_update", "action": "view_request", "request_id": "7"}))),
            "/dashboard/car-owner/requests/7"
        );
        assert_eq!(
            resolve_destination(&data(json!({"type": "diagnosis", "request_id": "42"}))),
            "/dashboard/car-owner/requests/42"
        );
        assert_eq!(
            resolve_destination(&data(json!({"type": "message", "request_id": "42"}))),
            "/dashboard/car-owner/requests/42/chat"
        );
    }

    #[test]
    fn test_message_routes_end_with_chat() {
        for id in ["1", "abc", "req-251018-a1b2c"] {
            let dest = resolve_destination(&data(json!({"type": "message", "request_id": id})));
            assert!(dest.ends_with("/chat"), "{}", dest);
        }
    }

    #[test]
    fn test_unmatched_goes_home() {
        let cases = [
            json!({}),
            json!({"type": "promo", "request_id": "1"}),
            json!({"type": "request_update"}),
            json!({"type": "request_update", "action": "view_request"}),
            json!({"type": "diagnosis"}),
            json!({"type": "message", "request_id": ""}),
            json!({"type": 12}),
        ];
        for case in cases {
            assert_eq!(resolve_destination(&data(case.clone())), "/", "{}", case);
        }
    }

    #[tokio::test]
    async fn test_focuses_first_visible_match() {
        let host = RecordingHost {
            clients: vec![
                client("hidden", "/dashboard/mechanic/requests", false),
                client("a", "/dashboard/mechanic/requests", true),
                client("b", "/dashboard/mechanic/requests?tab=open", true),
            ],
            ..Default::default()
        };
        let payload = NotificationPayload::from_json_lenient(json!({
            "data": {"type": "request_update", "action": "view_requests"}
        }));

        let outcome = handle_click(&host, &payload, ClickAction::Body).await;
        assert_eq!(
            outcome,
            ClickOutcome::Focused {
                client_id: "a".into(),
                destination: "/dashboard/mechanic/requests".into()
            }
        );
        assert_eq!(*host.focused.lock().unwrap(), vec!["a".to_string()]);
        assert!(host.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_opens_window_without_match() {
        let host = RecordingHost {
            clients: vec![client("a", "/dashboard/car-owner", true)],
            ..Default::default()
        };
        let payload = NotificationPayload::from_json_lenient(json!({
            "data": {"type": "message", "request_id": "9"}
        }));

        let outcome = handle_click(&host, &payload, ClickAction::View).await;
        assert_eq!(
            outcome,
            ClickOutcome::Opened { destination: "/dashboard/car-owner/requests/9/chat".into() }
        );
        assert_eq!(
            *host.opened.lock().unwrap(),
            vec!["/dashboard/car-owner/requests/9/chat".to_string()]
        );
    }

    #[tokio::test]
    async fn test_prefix_overlap_matches_longer_path() {
        let host = RecordingHost {
            clients: vec![client("tab42", "/dashboard/car-owner/requests/42", true)],
            ..Default::default()
        };
        let payload = NotificationPayload::from_json_lenient(json!({
            "data": {"type": "diagnosis", "request_id": "4"}
        }));

        let outcome = handle_click(&host, &payload, ClickAction::Body).await;
        assert!(matches!(outcome, ClickOutcome::Focused { ref client_id, .. } if client_id == "tab42"));
    }

    #[tokio::test]
    async fn test_close_action_dismisses() {
        let host = RecordingHost::default();
        let outcome = handle_click(&host, &NotificationPayload::default(), ClickAction::Close).await;
        assert_eq!(outcome, ClickOutcome::Dismissed);
        assert!(host.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enumeration_failure_opens_window() {
        let host = RecordingHost { fail_enumerate: true, ..Default::default() };
        let outcome = handle_click(&host, &NotificationPayload::default(), ClickAction::Body).await;
        assert_eq!(outcome, ClickOutcome::Opened { destination: "/".into() });
    }

    #[tokio::test]
    async fn test_click_event_uses_action_id() {
        let host = RecordingHost::default();
        let raw = json!({"data": {"type": "diagnosis", "request_id": "42"}});

        let outcome = handle_click_event(&host, raw.clone(), "close").await;
        assert_eq!(outcome, ClickOutcome::Dismissed);

        let outcome = handle_click_event(&host, raw, "view").await;
        assert_eq!(outcome, ClickOutcome::Opened { destination: "/dashboard/car-owner/requests/42".into() });
    }

    #[tokio::test]
    async fn test_click_event_tolerates_bad_fields() {
        let host = RecordingHost::default();

        let outcome = handle_click_event(
            &host,
            json!({"notification": {"title": "New message"}, "data": {"type": "message", "request_id": "5", "action": 3}}),
            "",
        )
        .await;
        assert_eq!(outcome, ClickOutcome::Opened { destination: "/dashboard/car-owner/requests/5/chat".into() });

        let outcome = handle_click_event(
            &host,
            json!({"notification": {"title": 7}, "data": {"type": "diagnosis", "request_id": "42"}}),
            "",
        )
        .await;
        assert_eq!(outcome, ClickOutcome::Opened { destination: "/dashboard/car-owner/requests/42".into() });
    }
}
