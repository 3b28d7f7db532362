use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Event lifecycle: Draft -> Pending -> Approved | Rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub location: String,
    pub status: EventStatus,
    /// XP advertised for attending this event.
    pub awards_xp: i64,
    pub created_by: Uuid,
    pub rejection_comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub awards_xp: i64,
}

/// Comment accompanying an approve/reject/cancel action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub location: String,
    pub status: String,
    pub awards_xp: i64,
    pub created_by: Uuid,
    pub rejection_comment: String,
    pub created_at: DateTime<Utc>,
}

/// One audit-trail row for a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalLogResponse {
    pub id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
