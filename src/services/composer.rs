// src/services/composer.rs
use chrono::Utc;
use serde_json::json;

use crate::models::{
    notification::{
        NotificationAction, NotificationContent, NotificationData, NotificationKind,
        NotificationPayload,
    },
    request::{RequestEvent, ServiceRequest},
};

const PREVIEW_LIMIT: usize = 80;

/// Builds the push payload for a domain event. The `data` block is what the
/// click router later turns back into a destination.
pub fn compose(event: &RequestEvent) -> NotificationPayload {
    match event {
        RequestEvent::RequestCreated { request } => payload(
            "New service request",
            format!(
                "{} for a {} {}",
                request.service_type.label(),
                request.vehicle.brand,
                request.vehicle.model
            ),
            NotificationKind::RequestUpdate,
            Some(NotificationAction::ViewRequests),
            request,
        ),
        RequestEvent::RequestStatusChanged { request } => payload(
            "Request updated",
            format!(
                "Your {} request is now {}",
                request.service_type.label(),
                request.status.label()
            ),
            NotificationKind::RequestUpdate,
            Some(NotificationAction::ViewRequest),
            request,
        ),
        RequestEvent::DiagnosisPosted { request, summary } => payload(
            "Diagnosis ready",
            truncate(summary),
            NotificationKind::Diagnosis,
            None,
            request,
        ),
        RequestEvent::MessageReceived { request, sender_name, preview } => payload(
            &format!("Message from {}", sender_name),
            truncate(preview),
            NotificationKind::Message,
            None,
            request,
        ),
    }
}

fn payload(
    title: &str,
    body: String,
    kind: NotificationKind,
    action: Option<NotificationAction>,
    request: &ServiceRequest,
) -> NotificationPayload {
    let mut data = NotificationData {
        kind: Some(kind),
        action,
        request_id: Some(request.id.clone()),
        ..Default::default()
    };
    data.extra.insert("sent_at".to_string(), json!(Utc::now().to_rfc3339()));

    NotificationPayload {
        notification: NotificationContent {
            title: Some(title.to_string()),
            body: Some(body),
            icon: None,
        },
        data,
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LIMIT {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_LIMIT - 1).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        catalog::ServiceType,
        request::{RequestStatus, Vehicle},
    };
    use crate::services::click_router::resolve_destination;

    fn request() -> ServiceRequest {
        ServiceRequest {
            id: "req-251018-a1b2c".into(),
            owner_id: "owner-1".into(),
            mechanic_id: Some("mech-1".into()),
            service_type: ServiceType::BrakeService,
            vehicle: Vehicle { brand: "Toyota".into(), model: "Corolla".into(), year: 2016 },
            description: "Squeaking when braking".into(),
            status: RequestStatus::Accepted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_created_routes_to_mechanic_list() {
        let payload = compose(&RequestEvent::RequestCreated { request: request() });
        assert_eq!(payload.notification.body.as_deref(), Some("Brake Service for a Toyota Corolla"));
        assert_eq!(resolve_destination(&payload.data), "/dashboard/mechanic/requests");
    }

    #[test]
    fn test_status_change_routes_to_owner_request() {
        let payload = compose(&RequestEvent::RequestStatusChanged { request: request() });
        assert_eq!(
            payload.notification.body.as_deref(),
            Some("Your Brake Service request is now accepted")
        );
        assert_eq!(
            resolve_destination(&payload.data),
            "/dashboard/car-owner/requests/req-251018-a1b2c"
        );
    }

    #[test]
    fn test_message_routes_to_chat_and_truncates() {
        let payload = compose(&RequestEvent::MessageReceived {
            request: request(),
            sender_name: "Kofi".into(),
            preview: "x".repeat(200),
        });
        assert_eq!(payload.notification.title.as_deref(), Some("Message from Kofi"));
        assert_eq!(payload.notification.body.as_ref().map(|b| b.chars().count()), Some(PREVIEW_LIMIT));
        assert!(resolve_destination(&payload.data).ends_with("/chat"));
    }

    #[test]
    fn test_diagnosis_payload_survives_fcm_data() {
        let payload = compose(&RequestEvent::DiagnosisPosted {
            request: request(),
            summary: "Worn pads".into(),
        });
        let data = payload.data_as_strings();
        assert_eq!(data.get("type").map(String::as_str), Some("diagnosis"));
        assert_eq!(data.get("request_id").map(String::as_str), Some("req-251018-a1b2c"));
        assert!(data.contains_key("sent_at"));
    }
}
