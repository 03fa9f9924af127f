// src/services/profile_events.rs
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing;

use crate::services::route_table::get_dashboard_route;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdated {
    pub uid: String,
    pub role: Option<String>,
}

impl ProfileUpdated {
    /// Dashboard to move to once this update carries a role.
    pub fn dashboard_target(&self) -> Option<&'static str> {
        self.role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(get_dashboard_route)
    }
}

/// Broadcast channel between whoever changes a profile and the redirect
/// consumers interested in it.
#[derive(Debug, Clone)]
pub struct ProfileEventBus {
    sender: broadcast::Sender<ProfileUpdated>,
}

impl Default for ProfileEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ProfileEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns how many subscribers saw the event.
    pub fn publish(&self, event: ProfileUpdated) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!("No subscribers for profile update of {}", event.uid);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProfileUpdated> {
        self.sender.subscribe()
    }

    /// Stream of dashboard targets for one user, driven by profile updates.
    pub fn redirects_for(&self, uid: String) -> impl Stream<Item = String> + Send + use<> {
        let receiver = self.subscribe();
        stream::unfold((receiver, uid), |(mut receiver, uid)| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.uid == uid => {
                        if let Some(target) = event.dashboard_target() {
                            return Some((target.to_string(), (receiver, uid)));
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Profile subscriber for {} lagged, skipped {} events", uid, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}
