// src/models/request.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::catalog::ServiceType;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,    // Submitted by the owner, no mechanic yet
    Accepted,   // A mechanic took the job
    InProgress, // Work has started
    Completed,  // Work finished
    Cancelled,  // Withdrawn by the owner or declined
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::InProgress => "in progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceRequest {
    pub id: String,
    pub owner_id: String,
    pub mechanic_id: Option<String>,
    pub service_type: ServiceType,
    pub vehicle: Vehicle,
    pub description: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Domain events that end up as push notifications.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RequestEvent {
    RequestCreated {
        request: ServiceRequest,
    },
    RequestStatusChanged {
        request: ServiceRequest,
    },
    DiagnosisPosted {
        request: ServiceRequest,
        summary: String,
    },
    MessageReceived {
        request: ServiceRequest,
        sender_name: String,
        preview: String,
    },
}

impl RequestEvent {
    pub fn request(&self) -> &ServiceRequest {
        match self {
            RequestEvent::RequestCreated { request }
            | RequestEvent::RequestStatusChanged { request }
            | RequestEvent::DiagnosisPosted { request, .. }
            | RequestEvent::MessageReceived { request, .. } => request,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub recipients: Vec<String>,
    #[serde(flatten)]
    pub event: RequestEvent,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DispatchReport {
    pub id: String,
    pub delivered: usize,
    pub failed: usize,
}
