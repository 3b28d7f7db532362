use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Role tag assigned by the identity provider.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Student,
    GroupLeader,
    Council,
    Teacher,
    Admin,
}

impl Role {
    /// Moderator capability: may approve or reject pending items.
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}

/// Authenticated actor as supplied by the upstream identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_moderator(&self) -> bool {
        self.role.is_moderator()
    }
}
