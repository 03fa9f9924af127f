// src/models/user.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    CarOwner, // Requests services for their vehicles
    Mechanic, // Diagnoses and performs the work
    Dealer,   // Sells vehicles and parts
}

impl Role {
    pub const ALL: [Role; 3] = [Role::CarOwner, Role::Mechanic, Role::Dealer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CarOwner => "CarOwner",
            Role::Mechanic => "Mechanic",
            Role::Dealer => "Dealer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CarOwner" => Ok(Role::CarOwner),
            "Mechanic" => Ok(Role::Mechanic),
            "Dealer" => Ok(Role::Dealer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Profile document as stored in the realtime database. The role is kept
/// as the raw string so that unknown values survive a round trip.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl UserProfile {
    /// A blank role counts as no role.
    pub fn role_str(&self) -> Option<&str> {
        self.role.as_deref().filter(|r| !r.trim().is_empty())
    }
}

/// The external signals the redirect logic observes on each evaluation.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct AuthSignals {
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

/// Read-only snapshot handed back to callers after each evaluation.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub has_profile: bool,
    pub is_loading: bool,
    pub needs_role_selection: bool,
}

impl From<&AuthSignals> for AuthStatus {
    fn from(signals: &AuthSignals) -> Self {
        let has_role = signals
            .profile
            .as_ref()
            .and_then(UserProfile::role_str)
            .is_some();
        Self {
            is_authenticated: signals.authenticated,
            has_profile: signals.profile.is_some(),
            is_loading: signals.loading,
            needs_role_selection: signals.authenticated && !has_role,
        }
    }
}

// Request/Response Models
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub user_id: String,
    pub token: String,
}
