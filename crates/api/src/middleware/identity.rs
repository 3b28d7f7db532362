//! # Identity Extraction
//!
//! The API trusts an upstream identity provider: every authenticated request
//! carries `X-User-Id` (a UUID) and `X-User-Role` (one of the closed role
//! set) headers. The [`Identity`] extractor turns them into a
//! [`Principal`]; missing or malformed headers are rejected with 401 before
//! the handler runs.

use axum::http::request::Parts;
use axum::{async_trait, extract::FromRequestParts};
use campus_core::errors::CampusError;
use campus_core::models::principal::{Principal, Role};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's role tag.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor wrapping the authenticated [`Principal`].
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Principal);

/// Parse the identity headers into a principal. Split out of the extractor
/// so it can be tested without a running server.
pub fn principal_from_headers(
    user_id: Option<&str>,
    role: Option<&str>,
) -> Result<Principal, CampusError> {
    let user_id = user_id
        .ok_or_else(|| CampusError::Authentication("Missing X-User-Id header".to_string()))?;
    let user_id = user_id
        .parse::<Uuid>()
        .map_err(|_| CampusError::Authentication("Invalid X-User-Id header".to_string()))?;

    let role = role
        .ok_or_else(|| CampusError::Authentication("Missing X-User-Role header".to_string()))?;
    let role = role
        .parse::<Role>()
        .map_err(|_| CampusError::Authentication(format!("Unknown role: {}", role)))?;

    Ok(Principal::new(user_id, role))
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok());
        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok());

        let principal = principal_from_headers(user_id, role)?;
        Ok(Identity(principal))
    }
}

/// Guard for moderator-only endpoints (role ∈ {admin, teacher}).
pub fn require_moderator(principal: &Principal) -> Result<(), AppError> {
    if principal.is_moderator() {
        Ok(())
    } else {
        Err(AppError(CampusError::Authorization(
            "Admin or teacher role required".to_string(),
        )))
    }
}
