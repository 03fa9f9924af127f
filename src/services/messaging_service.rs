// src/services/messaging_service.rs
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;
use tracing;

use crate::{
    errors::CarCareError as AppError,
    models::{
        notification::NotificationPayload,
        request::{DispatchReport, RequestEvent},
    },
    services::{composer::compose, device_registry::DeviceRegistry},
    utils::id_generator::{IdGenerator, IdType},
};

pub const DEFAULT_FCM_URL: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub fcm_server_key: String,
    pub fcm_url: String,
    /// Origin used to build absolute click links for web clients.
    pub app_origin: Option<String>,
}

impl FcmConfig {
    pub fn new(fcm_server_key: String) -> Self {
        Self {
            fcm_server_key,
            fcm_url: DEFAULT_FCM_URL.to_string(),
            app_origin: None,
        }
    }
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_to_device(&self, device_token: &str, payload: &NotificationPayload) -> Result<(), AppError>;

    /// Fans out to every token registered for the user. Returns (delivered, failed).
    async fn send_to_user(&self, user_id: &str, payload: &NotificationPayload) -> Result<(usize, usize), AppError>;

    async fn dispatch(&self, recipients: &[String], event: &RequestEvent) -> Result<DispatchReport, AppError> {
        if recipients.is_empty() {
            return Err(AppError::NoRecipients);
        }

        let id = IdGenerator::generate(IdType::Dispatch);
        let payload = compose(event);
        tracing::info!(
            "Dispatch {} for request {} to {} recipients",
            id,
            event.request().id,
            recipients.len()
        );

        let mut report = DispatchReport { id, delivered: 0, failed: 0 };
        for user_id in recipients {
            match self.send_to_user(user_id, &payload).await {
                Ok((delivered, failed)) => {
                    report.delivered += delivered;
                    report.failed += failed;
                }
                Err(e) => {
                    tracing::warn!("Dispatch {} skipped user {}: {}", report.id, user_id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

pub struct FcmNotificationService {
    config: FcmConfig,
    client: reqwest::Client,
    devices: Arc<dyn DeviceRegistry>,
}

impl FcmNotificationService {
    pub fn new(config: FcmConfig, devices: Arc<dyn DeviceRegistry>) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            devices,
        }
    }

    /// Legacy FCM HTTP body. `data` carries the routing fields as strings.
    pub fn build_message(&self, device_token: &str, payload: &NotificationPayload) -> serde_json::Value {
        let content = &payload.notification;
        let mut message = json!({
            "to": device_token,
            "notification": {
                "title": content.title,
                "body": content.body,
                "icon": content.icon,
                "tag": crate::models::notification::NOTIFICATION_TAG,
            },
            "data": payload.data_as_strings(),
            "priority": "high",
        });

        if let Some(origin) = &self.config.app_origin {
            let destination = crate::services::click_router::resolve_destination(&payload.data);
            message["notification"]["click_action"] =
                json!(format!("{}{}", origin.trim_end_matches('/'), destination));
        }

        message
    }
}

#[async_trait]
impl NotificationService for FcmNotificationService {
    async fn send_to_device(&self, device_token: &str, payload: &NotificationPayload) -> Result<(), AppError> {
        if device_token.is_empty() {
            return Err(AppError::FcmInvalidToken("Empty device token".to_string()));
        }

        tracing::info!("Sending FCM notification to device: {}", device_token);

        let response = self
            .client
            .post(&self.config.fcm_url)
            .header("Authorization", format!("key={}", self.config.fcm_server_key))
            .json(&self.build_message(device_token, payload))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("FCM request failed: {}", error_text);
            return Err(AppError::FcmDelivery(error_text));
        }

        tracing::debug!("FCM notification sent successfully");
        Ok(())
    }

    async fn send_to_user(&self, user_id: &str, payload: &NotificationPayload) -> Result<(usize, usize), AppError> {
        let tokens = self.devices.tokens_for(user_id).await?;
        if tokens.is_empty() {
            return Err(AppError::NoDeviceTokens(user_id.to_string()));
        }

        let results = join_all(tokens.iter().map(|token| self.send_to_device(token, payload))).await;
        let delivered = results.iter().filter(|r| r.is_ok()).count();
        Ok((delivered, results.len() - delivered))
    }
}

/// Mock service for development and testing
pub struct MockNotificationService {
    devices: Arc<dyn DeviceRegistry>,
}

impl MockNotificationService {
    pub fn new(devices: Arc<dyn DeviceRegistry>) -> Self {
        Self { devices }
    }
}

#[async_trait]
impl NotificationService for MockNotificationService {
    async fn send_to_device(&self, device_token: &str, payload: &NotificationPayload) -> Result<(), AppError> {
        if device_token.is_empty() {
            return Err(AppError::FcmInvalidToken("Empty device token".to_string()));
        }
        tracing::info!(
            "[MOCK] Would send FCM to {}: {:?} - {:?}",
            device_token,
            payload.notification.title,
            payload.notification.body
        );
        Ok(())
    }

    async fn send_to_user(&self, user_id: &str, payload: &NotificationPayload) -> Result<(usize, usize), AppError> {
        let tokens = self.devices.tokens_for(user_id).await?;
        if tokens.is_empty() {
            return Err(AppError::NoDeviceTokens(user_id.to_string()));
        }
        for token in &tokens {
            self.send_to_device(token, payload).await?;
        }
        Ok((tokens.len(), 0))
    }
}
