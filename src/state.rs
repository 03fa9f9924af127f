// src/state.rs
use std::sync::Arc;

use crate::errors::CarCareError as AppError;
use crate::services::{
    device_registry::{DeviceRegistry, InMemoryDeviceRegistry, RedisDeviceRegistry},
    messaging_service::{
        FcmConfig, FcmNotificationService, MockNotificationService, NotificationService,
        DEFAULT_FCM_URL,
    },
    profile_events::ProfileEventBus,
    profile_store::{FirebaseProfileStore, InMemoryProfileStore, ProfileStore},
};

pub struct AppState {
    pub devices: Arc<dyn DeviceRegistry>,
    pub notification_service: Arc<dyn NotificationService>,
    pub profiles: Arc<dyn ProfileStore>,
    pub profile_events: ProfileEventBus,
    pub config: AppConfig,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub redis_url: Option<String>,
    pub fcm_server_key: Option<String>,
    pub fcm_url: String,
    pub firebase_database_url: Option<String>,
    pub firebase_auth_token: Option<String>,
    pub app_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            redis_url: None,
            fcm_server_key: None,
            fcm_url: DEFAULT_FCM_URL.to_string(),
            firebase_database_url: None,
            firebase_auth_token: None,
            app_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("CARCARE_BIND_ADDR").unwrap_or(defaults.bind_addr),
            redis_url: get("REDIS_URL"),
            fcm_server_key: get("FCM_SERVER_KEY"),
            fcm_url: get("FCM_URL").unwrap_or(defaults.fcm_url),
            firebase_database_url: get("FIREBASE_DATABASE_URL"),
            firebase_auth_token: get("FIREBASE_AUTH_TOKEN"),
            app_origin: get("CARCARE_APP_ORIGIN"),
        }
    }
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        let devices: Arc<dyn DeviceRegistry> = match &config.redis_url {
            Some(url) => Arc::new(RedisDeviceRegistry::connect(url).await?),
            None => {
                tracing::warn!("REDIS_URL not set, keeping device tokens in memory");
                Arc::new(InMemoryDeviceRegistry::default())
            }
        };

        let notification_service: Arc<dyn NotificationService> = match &config.fcm_server_key {
            Some(key) => Arc::new(FcmNotificationService::new(
                FcmConfig {
                    fcm_server_key: key.clone(),
                    fcm_url: config.fcm_url.clone(),
                    app_origin: config.app_origin.clone(),
                },
                devices.clone(),
            )),
            None => {
                tracing::warn!("FCM_SERVER_KEY not set, using mock notification service");
                Arc::new(MockNotificationService::new(devices.clone()))
            }
        };

        let profiles: Arc<dyn ProfileStore> = match &config.firebase_database_url {
            Some(url) => Arc::new(FirebaseProfileStore::new(
                url,
                config.firebase_auth_token.as_deref(),
            )?),
            None => {
                tracing::warn!("FIREBASE_DATABASE_URL not set, using in-memory profiles");
                Arc::new(InMemoryProfileStore::default())
            }
        };

        Ok(Self::with_services(devices, notification_service, profiles, config))
    }

    pub fn with_services(
        devices: Arc<dyn DeviceRegistry>,
        notification_service: Arc<dyn NotificationService>,
        profiles: Arc<dyn ProfileStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            devices,
            notification_service,
            profiles,
            profile_events: ProfileEventBus::default(),
            config,
        }
    }
}
