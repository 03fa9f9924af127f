// src/services/profile_store.rs
use async_trait::async_trait;
use firebase_rs::Firebase;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing;

use crate::errors::CarCareError as AppError;
use crate::models::user::UserProfile;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;
    async fn set_role(&self, uid: &str, role: &str) -> Result<UserProfile, AppError>;
}

/// Profiles live under `users/{uid}` in the Firebase Realtime Database.
pub struct FirebaseProfileStore {
    firebase: Firebase,
}

impl FirebaseProfileStore {
    pub fn new(database_url: &str, auth_token: Option<&str>) -> Result<Self, AppError> {
        let firebase = match auth_token {
            Some(token) => Firebase::auth(database_url, token),
            None => Firebase::new(database_url),
        }
        .map_err(|e| AppError::InvalidConfiguration(format!("Firebase URL: {:?}", e)))?;

        Ok(Self { firebase })
    }
}

#[async_trait]
impl ProfileStore for FirebaseProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        tracing::debug!("Fetching profile for {}", uid);
        // A missing path comes back as a `null` body.
        match self.firebase.at("users").at(uid).get::<Option<UserProfile>>().await {
            Ok(body) => Ok(profile_from_body(uid, body)),
            Err(firebase_rs::RequestError::NotFoundOrNullBody) => Ok(None),
            Err(e) => Err(AppError::FirebaseDatabase(format!("{:?}", e))),
        }
    }

    async fn set_role(&self, uid: &str, role: &str) -> Result<UserProfile, AppError> {
        let mut profile = self
            .get_profile(uid)
            .await?
            .ok_or_else(|| AppError::user_not_found(uid))?;
        profile.role = Some(role.to_string());

        self.firebase
            .at("users")
            .at(uid)
            .update(&profile)
            .await
            .map_err(|e| AppError::FirebaseDatabase(format!("{:?}", e)))?;

        tracing::info!("Updated role for {} to {}", uid, role);
        Ok(profile)
    }
}

fn profile_from_body(uid: &str, body: Option<UserProfile>) -> Option<UserProfile> {
    body.map(|mut profile| {
        if profile.uid.is_empty() {
            profile.uid = uid.to_string();
        }
        profile
    })
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles.write().await.insert(profile.uid.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn set_role(&self, uid: &str, role: &str) -> Result<UserProfile, AppError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(uid)
            .ok_or_else(|| AppError::user_not_found(uid))?;
        profile.role = Some(role.to_string());
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_set_role() {
        let store = InMemoryProfileStore::default();
        store.insert(UserProfile { uid: "u1".into(), ..Default::default() }).await;

        let updated = store.set_role("u1", "Dealer").await.unwrap();
        assert_eq!(updated.role_str(), Some("Dealer"));
        assert_eq!(store.get_profile("u1").await.unwrap(), Some(updated));

        assert!(matches!(
            store.set_role("ghost", "Dealer").await,
            Err(AppError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_null_body_is_missing_profile() {
        let body: Option<UserProfile> = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(profile_from_body("u1", body), None);
    }

    #[test]
    fn test_body_without_uid_gets_path_uid() {
        let body: Option<UserProfile> =
            serde_json::from_value(serde_json::json!({"role": "Mechanic"})).unwrap();
        let profile = profile_from_body("u1", body).unwrap();
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.role_str(), Some("Mechanic"));
    }

    #[test]
    fn test_firebase_rejects_bad_url() {
        assert!(matches!(
            FirebaseProfileStore::new("not a url", None),
            Err(AppError::InvalidConfiguration(_))
        ));
    }
}
