// src/services/route_table.rs
use crate::models::user::Role;

pub const HOME_ROUTE: &str = "/";
pub const ROLE_SELECTION_ROUTE: &str = "/auth/role-selection";
pub const MECHANIC_REQUESTS_ROUTE: &str = "/dashboard/mechanic/requests";

const CAR_OWNER_REQUESTS_ROUTE: &str = "/dashboard/car-owner/requests";

impl Role {
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            Role::CarOwner => "/dashboard/car-owner",
            Role::Mechanic => "/dashboard/mechanic",
            Role::Dealer => "/dashboard/dealer",
        }
    }
}

/// Dashboard root for a raw role string; anything outside the closed set
/// sends the user to pick a role.
pub fn get_dashboard_route(role: &str) -> &'static str {
    match role.parse::<Role>() {
        Ok(role) => role.dashboard_route(),
        Err(e) => {
            tracing::debug!("{}, falling back to role selection", e);
            ROLE_SELECTION_ROUTE
        }
    }
}

pub fn owner_request_route(request_id: &str) -> String {
    format!("{}/{}", CAR_OWNER_REQUESTS_ROUTE, request_id)
}

pub fn owner_chat_route(request_id: &str) -> String {
    format!("{}/{}/chat", CAR_OWNER_REQUESTS_ROUTE, request_id)
}
