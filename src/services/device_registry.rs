// src/services/device_registry.rs
use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing;

use crate::errors::CarCareError as AppError;

pub struct CacheKeys;

impl CacheKeys {
    pub fn devices_for_user(user_id: &str) -> String {
        format!("carcare:devices:{}", user_id)
    }
}

/// Push tokens per user. Registering the same token twice is a no-op.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn register(&self, user_id: &str, token: &str) -> Result<(), AppError>;
    async fn unregister(&self, user_id: &str, token: &str) -> Result<(), AppError>;
    async fn tokens_for(&self, user_id: &str) -> Result<Vec<String>, AppError>;
}

pub struct RedisDeviceRegistry {
    connection: redis::aio::MultiplexedConnection,
}

impl RedisDeviceRegistry {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        tracing::info!("Connected device registry to Redis");
        Ok(Self { connection })
    }
}

#[async_trait]
impl DeviceRegistry for RedisDeviceRegistry {
    async fn register(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let mut conn = self.connection.clone();
        let _: () = conn.sadd(CacheKeys::devices_for_user(user_id), token).await?;
        tracing::debug!("Registered device token for user: {}", user_id);
        Ok(())
    }

    async fn unregister(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let mut conn = self.connection.clone();
        let _: () = conn.srem(CacheKeys::devices_for_user(user_id), token).await?;
        tracing::debug!("Removed device token for user: {}", user_id);
        Ok(())
    }

    async fn tokens_for(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.connection.clone();
        let mut tokens: Vec<String> = conn.smembers(CacheKeys::devices_for_user(user_id)).await?;
        tokens.sort();
        Ok(tokens)
    }
}

#[derive(Default)]
pub struct InMemoryDeviceRegistry {
    tokens: RwLock<HashMap<String, BTreeSet<String>>>,
}

#[async_trait]
impl DeviceRegistry for InMemoryDeviceRegistry {
    async fn register(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        self.tokens
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(token.to_string());
        Ok(())
    }

    async fn unregister(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if let Some(set) = tokens.get_mut(user_id) {
            set.remove(token);
            if set.is_empty() {
                tokens.remove(user_id);
            }
        }
        Ok(())
    }

    async fn tokens_for(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .tokens
            .read()
            .await
            .get(user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}
