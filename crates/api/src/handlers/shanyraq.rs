use axum::{
    extract::{Path, State},
    Json,
};
use campus_core::{
    errors::CampusError,
    models::shanyraq::{CreateShanyraqRequest, ShanyraqMembership, ShanyraqResponse},
};
use campus_db::models::DbShanyraq;
use campus_db::services::points;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{require_moderator, Identity},
    },
    ApiState,
};

fn to_response(shanyraq: DbShanyraq) -> ShanyraqResponse {
    ShanyraqResponse {
        id: shanyraq.id,
        name: shanyraq.name,
        slug: shanyraq.slug,
        total_points: shanyraq.total_points,
    }
}

#[axum::debug_handler]
pub async fn create_shanyraq(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateShanyraqRequest>,
) -> Result<Json<ShanyraqResponse>, AppError> {
    require_moderator(&actor)?;

    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Name and slug are required".to_string(),
        )));
    }

    let shanyraq = campus_db::repositories::shanyraq::create_shanyraq(
        &state.db_pool,
        payload.name.trim(),
        payload.slug.trim(),
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(to_response(shanyraq)))
}

#[axum::debug_handler]
pub async fn list_shanyraqs(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ShanyraqResponse>>, AppError> {
    let shanyraqs = campus_db::repositories::shanyraq::list_shanyraqs(&state.db_pool)
        .await
        .map_err(CampusError::Database)?;

    Ok(Json(shanyraqs.into_iter().map(to_response).collect()))
}

#[axum::debug_handler]
pub async fn get_shanyraq(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShanyraqResponse>, AppError> {
    let shanyraq = campus_db::repositories::shanyraq::get_shanyraq_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Shanyraq with ID {} not found", id)))?;

    Ok(Json(to_response(shanyraq)))
}

/// Join a shanyraq. Re-joining refreshes the membership so the
/// most-recently-joined group becomes the user's current one for points
/// attribution.
#[axum::debug_handler]
pub async fn join_shanyraq(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<ShanyraqMembership>, AppError> {
    campus_db::repositories::shanyraq::get_shanyraq_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Shanyraq with ID {} not found", id)))?;

    let membership =
        campus_db::repositories::shanyraq::add_member(&state.db_pool, actor.id, id, false)
            .await
            .map_err(CampusError::Database)?;

    Ok(Json(ShanyraqMembership {
        id: membership.id,
        user_id: membership.user_id,
        shanyraq_id: membership.shanyraq_id,
        is_leader: membership.is_leader,
        joined_at: membership.joined_at,
    }))
}

#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub shanyraq_id: Uuid,
    pub total_points: i64,
}

/// Recompute one group's cached total from the ledger.
#[axum::debug_handler]
pub async fn recalculate(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RecalculateResponse>, AppError> {
    require_moderator(&actor)?;

    let total = points::recalculate_shanyraq_total(&state.db_pool, id).await?;

    Ok(Json(RecalculateResponse {
        shanyraq_id: id,
        total_points: total,
    }))
}

#[derive(Debug, Serialize)]
pub struct RecalculateAllResponse {
    pub recalculated: usize,
}

/// Disaster-recovery recompute of every group's cached total.
#[axum::debug_handler]
pub async fn recalculate_all(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
) -> Result<Json<RecalculateAllResponse>, AppError> {
    require_moderator(&actor)?;

    let count = points::recalculate_all_totals(&state.db_pool).await?;

    Ok(Json(RecalculateAllResponse {
        recalculated: count,
    }))
}
