use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::principal::Role;

/// A provisioned account. Authentication itself happens upstream; this row
/// carries the role tag and the cached point balances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    /// Cached sum of all the user's ledger entries.
    pub lifetime_points: i64,
    /// Cached sum of the user's ledger entries inside the active season.
    pub season_points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub lifetime_points: i64,
    pub season_points: i64,
    pub created_at: DateTime<Utc>,
}
