// src/services/redirect.rs
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing;

use crate::models::user::{AuthSignals, AuthStatus, Role};
use crate::services::profile_events::ProfileEventBus;
use crate::services::route_table::{get_dashboard_route, HOME_ROUTE, ROLE_SELECTION_ROUTE};

/// Router side of the redirect logic.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RedirectOptions {
    /// Roles allowed on the current page. `None` means no restriction.
    #[serde(default)]
    pub allowed_roles: Option<Vec<Role>>,
    /// Explicit destination once the user is fully set up.
    #[serde(default)]
    pub target: Option<String>,
}

/// Result of one evaluation: where to go, and the auth marker to carry
/// into the next evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedirectStep {
    pub target: Option<String>,
    pub was_authenticated: bool,
}

impl RedirectStep {
    fn stay(was_authenticated: bool) -> Self {
        Self { target: None, was_authenticated }
    }

    fn go(target: impl Into<String>, was_authenticated: bool) -> Self {
        Self { target: Some(target.into()), was_authenticated }
    }
}

pub fn decide_redirect(
    was_authenticated: bool,
    signals: &AuthSignals,
    options: &RedirectOptions,
) -> RedirectStep {
    if signals.loading {
        return RedirectStep::stay(was_authenticated);
    }

    if was_authenticated && !signals.authenticated {
        tracing::info!("Signed out, redirecting home");
        return RedirectStep::go(HOME_ROUTE, false);
    }

    let now_authenticated = signals.authenticated;
    if !now_authenticated {
        return RedirectStep::stay(false);
    }

    let role = signals.profile.as_ref().and_then(|p| p.role_str());
    let Some(role) = role else {
        tracing::debug!("Authenticated without a role, sending to role selection");
        return RedirectStep::go(ROLE_SELECTION_ROUTE, true);
    };

    if let Some(allowed) = &options.allowed_roles {
        let permitted = role
            .parse::<Role>()
            .map(|r| allowed.contains(&r))
            .unwrap_or(false);
        if !permitted {
            tracing::debug!("Role {} not allowed here", role);
            return RedirectStep::go(get_dashboard_route(role), true);
        }
    }

    if let Some(target) = &options.target {
        return RedirectStep::go(target.clone(), true);
    }

    if options.allowed_roles.is_none() {
        return RedirectStep::go(get_dashboard_route(role), true);
    }

    RedirectStep::stay(true)
}

/// Stateful driver around [`decide_redirect`]. It keeps the previous auth
/// marker between evaluations and performs navigation itself.
pub struct AuthRedirector {
    navigator: Arc<dyn Navigator>,
    options: RedirectOptions,
    was_authenticated: bool,
}

impl AuthRedirector {
    pub fn new(navigator: Arc<dyn Navigator>, options: RedirectOptions) -> Self {
        Self {
            navigator,
            options,
            was_authenticated: false,
        }
    }

    pub fn evaluate(&mut self, signals: &AuthSignals) -> AuthStatus {
        let step = decide_redirect(self.was_authenticated, signals, &self.options);
        self.was_authenticated = step.was_authenticated;

        if let Some(target) = step.target {
            self.navigator.navigate(&target);
        }

        AuthStatus::from(signals)
    }

    /// Redirects to the dashboard whenever `uid`'s profile gains a role,
    /// independently of `evaluate`.
    pub fn follow_profile_updates(&self, uid: String, bus: &ProfileEventBus) -> JoinHandle<()> {
        let navigator = self.navigator.clone();
        let mut receiver = bus.subscribe();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.uid == uid => {
                        if let Some(target) = event.dashboard_target() {
                            tracing::info!("Profile for {} updated, redirecting to {}", uid, target);
                            navigator.navigate(target);
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Redirect listener lagged, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
