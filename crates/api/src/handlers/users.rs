use axum::{
    extract::{Path, State},
    Json,
};
use campus_core::{
    errors::CampusError,
    models::user::{CreateUserRequest, UserResponse},
};
use campus_db::models::DbUser;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{require_moderator, Identity},
    },
    ApiState,
};

fn to_response(user: DbUser) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        lifetime_points: user.lifetime_points,
        season_points: user.season_points,
        created_at: user.created_at,
    }
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    require_moderator(&actor)?;

    if payload.email.trim().is_empty() || payload.display_name.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Email and display name are required".to_string(),
        )));
    }

    let user = campus_db::repositories::user::create_user(
        &state.db_pool,
        payload.email.trim(),
        payload.display_name.trim(),
        &payload.role.to_string(),
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(to_response(user)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = campus_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(to_response(user)))
}

/// Restore the user's cached balances from the ledger.
#[axum::debug_handler]
pub async fn recalculate_user(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    require_moderator(&actor)?;

    campus_db::services::points::recalculate_user_points(&state.db_pool, id).await?;

    let user = campus_db::repositories::user::get_user_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(to_response(user)))
}
