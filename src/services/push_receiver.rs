// src/services/push_receiver.rs
use async_trait::async_trait;
use tracing;

use crate::models::notification::{
    NotificationButton, NotificationPayload, OsNotification, BADGE_ICON, DEFAULT_ICON,
    DEFAULT_TITLE, NOTIFICATION_TAG,
};

/// OS-level notification surface.
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    async fn show(&self, notification: &OsNotification) -> Result<(), String>;
}

pub fn render_notification(payload: &NotificationPayload) -> OsNotification {
    let content = &payload.notification;

    OsNotification {
        title: content
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        body: content.body.clone().unwrap_or_default(),
        icon: content
            .icon
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_ICON.to_string()),
        badge: BADGE_ICON.to_string(),
        tag: NOTIFICATION_TAG.to_string(),
        actions: vec![
            NotificationButton { action: "view".to_string(), title: "View".to_string() },
            NotificationButton { action: "close".to_string(), title: "Close".to_string() },
        ],
        data: payload.data.clone(),
    }
}

/// Handles one background push: render it and hand it to the display.
pub async fn on_background_message(
    display: &dyn NotificationDisplay,
    raw: serde_json::Value,
) -> OsNotification {
    let payload = NotificationPayload::from_json_lenient(raw);
    tracing::info!("Received background message: {:?}", payload.notification.title);

    let notification = render_notification(&payload);
    if let Err(e) = display.show(&notification).await {
        tracing::error!("Failed to show notification: {}", e);
    }
    notification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::NotificationKind;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDisplay {
        shown: Mutex<Vec<OsNotification>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationDisplay for RecordingDisplay {
        async fn show(&self, notification: &OsNotification) -> Result<(), String> {
            if self.fail {
                return Err("permission denied".into());
            }
            self.shown.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    #[test]
    fn test_render_defaults() {
        let rendered = render_notification(&NotificationPayload::default());
        assert_eq!(rendered.title, "CarCare");
        assert_eq!(rendered.body, "");
        assert_eq!(rendered.icon, DEFAULT_ICON);
        assert_eq!(rendered.badge, BADGE_ICON);
        assert_eq!(rendered.tag, "car-care-notification");
        let actions: Vec<_> = rendered.actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["view", "close"]);
    }

    #[tokio::test]
    async fn test_background_message_is_shown_with_data() {
        let display = RecordingDisplay::default();
        let rendered = on_background_message(
            &display,
            json!({
                "notification": {"title": "Diagnosis ready", "body": "Brake pads worn", "icon": "/m.png"},
                "data": {"type": "diagnosis", "request_id": "42"}
            }),
        )
        .await;

        assert_eq!(rendered.title, "Diagnosis ready");
        assert_eq!(rendered.icon, "/m.png");
        assert_eq!(rendered.data.kind, Some(NotificationKind::Diagnosis));
        assert_eq!(display.shown.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_display_failure_is_swallowed() {
        let display = RecordingDisplay { fail: true, ..Default::default() };
        let rendered = on_background_message(&display, json!(null)).await;
        assert_eq!(rendered.title, "CarCare");
        assert!(display.shown.lock().unwrap().is_empty());
    }
}
