use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Provenance of a ledger entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SourceType {
    Event,
    Activity,
    Admin,
    Penalty,
}

/// Append-only point/XP delta. Never updated or deleted; corrections are
/// new offsetting entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shanyraq_id: Option<Uuid>,
    pub amount: i64,
    pub reason: String,
    pub source_type: SourceType,
    pub source_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPointsRequest {
    pub user_id: Uuid,
    /// Explicit group to post against; defaults to the user's current group.
    pub shanyraq_id: Option<Uuid>,
    pub amount: i64,
    #[serde(default)]
    pub reason: String,
    pub source_type: SourceType,
    pub source_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokePointsRequest {
    pub user_id: Uuid,
    pub shanyraq_id: Option<Uuid>,
    /// Positive magnitude to take away.
    pub amount: i64,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shanyraq_id: Option<Uuid>,
    pub amount: i64,
    pub reason: String,
    pub source_type: String,
    pub source_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Per-source-type sum of a user's ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionBreakdownEntry {
    pub source_type: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionBreakdownResponse {
    pub user_id: Uuid,
    pub entries: Vec<ContributionBreakdownEntry>,
}
