use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuestType {
    Daily,
    Weekly,
    Milestone,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RewardType {
    Xp,
    Cosmetic,
    Badge,
    Title,
    Other,
}

/// A time-boxed season with its level/XP curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub xp_per_level: i32,
    pub max_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeasonRequest {
    pub name: String,
    pub slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: i32,
    #[serde(default = "default_max_level")]
    pub max_level: i32,
}

fn default_xp_per_level() -> i32 {
    100
}

fn default_max_level() -> i32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
    pub season_id: Uuid,
    pub quest_type: QuestType,
    pub title: String,
    pub target: i32,
    pub xp_reward: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestRequest {
    pub quest_type: QuestType,
    pub title: String,
    pub target: i32,
    pub xp_reward: i64,
}

/// A reward slot on the season track, unique per (season, level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonReward {
    pub id: Uuid,
    pub season_id: Uuid,
    pub level: i32,
    pub name: String,
    pub reward_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRewardRequest {
    pub level: i32,
    pub name: String,
    pub reward_type: RewardType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuestProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quest_id: Uuid,
    pub current_progress: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddProgressRequest {
    #[serde(default = "default_progress_amount")]
    pub amount: i32,
}

fn default_progress_amount() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub quest_id: Uuid,
    pub current_progress: i32,
    pub target: i32,
    /// True only on the call that first reached the target.
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelResponse {
    pub season_id: Uuid,
    pub xp: i64,
    pub level: u32,
    pub xp_into_level: u32,
    pub xp_per_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRewardRequest {
    pub level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRewardResponse {
    pub reward_id: Uuid,
    pub level: i32,
    pub name: String,
    pub claimed_at: DateTime<Utc>,
}

/// One reward on the season track with the viewer's claim status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTrackEntry {
    pub reward_id: Uuid,
    pub level: i32,
    pub name: String,
    pub reward_type: String,
    pub claimed: bool,
    pub can_claim: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardTrackResponse {
    pub season_id: Uuid,
    pub rewards: Vec<RewardTrackEntry>,
}
