// src/models/notification.rs
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Tag shared by every CarCare notification so a new one replaces the one on screen.
pub const NOTIFICATION_TAG: &str = "car-care-notification";
pub const DEFAULT_TITLE: &str = "CarCare";
pub const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
pub const BADGE_ICON: &str = "/icons/badge-72x72.png";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestUpdate, // Service request created or changed
    Diagnosis,     // Mechanic posted a diagnosis
    Message,       // New chat message on a request
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    ViewRequests, // Mechanic request list
    ViewRequest,  // Single owner request
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NotificationContent {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// The `data` bag attached to a push message. Only `type`, `action` and
/// `request_id` drive routing; everything else rides along untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NotificationData {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<NotificationKind>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct NotificationPayload {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub notification: NotificationContent,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub data: NotificationData,
}

impl NotificationPayload {
    /// Parses a raw push body. Fields of the wrong type are dropped one by
    /// one; a body that isn't an object degrades to an empty payload, which
    /// routes to the home page.
    pub fn from_json_lenient(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Malformed notification payload, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// FCM data messages only carry string values.
    pub fn data_as_strings(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        if let Some(kind) = self.data.kind {
            if let Ok(serde_json::Value::String(s)) = serde_json::to_value(kind) {
                out.insert("type".to_string(), s);
            }
        }
        if let Some(action) = self.data.action {
            if let Ok(serde_json::Value::String(s)) = serde_json::to_value(action) {
                out.insert("action".to_string(), s);
            }
        }
        if let Some(request_id) = &self.data.request_id {
            out.insert("request_id".to_string(), request_id.clone());
        }
        for (key, value) in &self.data.extra {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out.entry(key.clone()).or_insert(value);
        }
        out
    }
}

/// A field of the wrong type reads as absent instead of failing the payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NotificationButton {
    pub action: String,
    pub title: String,
}

/// What the receiver hands to the OS notification surface.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OsNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub actions: Vec<NotificationButton>,
    pub data: NotificationData,
}

/// Which part of the OS notification the user interacted with.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    #[default]
    Body,
    View,
    Close,
}

impl ClickAction {
    pub fn from_action_id(action: &str) -> Self {
        match action {
            "view" => ClickAction::View,
            "close" => ClickAction::Close,
            _ => ClickAction::Body,
        }
    }
}
