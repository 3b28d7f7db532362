use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub lifetime_points: i64,
    pub season_points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShanyraq {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub total_points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShanyraqMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shanyraq_id: Uuid,
    pub is_leader: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLedgerEntry {
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEvent {
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
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEventApprovalLog {
    pub id: Uuid,
    pub event_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSpace {
    pub id: Uuid,
    pub name: String,
    pub space_type: String,
    pub capacity: i32,
    pub location: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSpaceBooking {
    pub id: Uuid,
    pub space_id: Uuid,
    pub booked_by: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub purpose: String,
    pub attendees_count: i32,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingApprovalLog {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub from_status: String,
    pub to_status: String,
    pub changed_by: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSeason {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub xp_per_level: i32,
    pub max_level: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuest {
    pub id: Uuid,
    pub season_id: Uuid,
    pub quest_type: String,
    pub title: String,
    pub target: i32,
    pub xp_reward: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbQuestProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quest_id: Uuid,
    pub current_progress: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSeasonReward {
    pub id: Uuid,
    pub season_id: Uuid,
    pub level: i32,
    pub name: String,
    pub reward_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserReward {
    pub id: Uuid,
    pub user_id: Uuid,
    pub season_reward_id: Uuid,
    pub claimed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeam {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub is_leader: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamRequest {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub status: String,
    pub invited_by: Option<Uuid>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Joined leaderboard row: user plus points.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudentPoints {
    pub user_id: Uuid,
    pub display_name: String,
    pub points: i64,
}

/// Per-source-type sum of a user's ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSourceSum {
    pub source_type: String,
    pub total: i64,
}
