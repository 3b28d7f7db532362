use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shanyraq group (class/house) accumulating collective points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shanyraq {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// Cached sum of this group's ledger entries, clamped at zero.
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShanyraqMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shanyraq_id: Uuid,
    pub is_leader: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShanyraqRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShanyraqResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub total_points: i64,
}

/// One row of the student leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLeaderboardEntry {
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLeaderboardResponse {
    pub entries: Vec<StudentLeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShanyraqLeaderboardResponse {
    pub entries: Vec<ShanyraqResponse>,
}
