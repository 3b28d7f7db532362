use axum::{
    extract::{Path, Query, State},
    Json,
};
use campus_core::{
    errors::CampusError,
    models::ledger::{
        ContributionBreakdownEntry, ContributionBreakdownResponse, LedgerEntryResponse,
        PostPointsRequest, RevokePointsRequest,
    },
    models::shanyraq::{
        ShanyraqResponse, StudentLeaderboardEntry, StudentLeaderboardResponse,
        ShanyraqLeaderboardResponse,
    },
};
use campus_db::models::DbLedgerEntry;
use campus_db::services::points;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{require_moderator, Identity},
    },
    ApiState,
};

fn to_response(entry: DbLedgerEntry) -> LedgerEntryResponse {
    LedgerEntryResponse {
        id: entry.id,
        user_id: entry.user_id,
        shanyraq_id: entry.shanyraq_id,
        amount: entry.amount,
        reason: entry.reason,
        source_type: entry.source_type,
        source_id: entry.source_id,
        approved_by: entry.approved_by,
        created_at: entry.created_at,
    }
}

/// Post a signed point delta. A zero amount is a no-op and returns null.
#[axum::debug_handler]
pub async fn post_points(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<PostPointsRequest>,
) -> Result<Json<Option<LedgerEntryResponse>>, AppError> {
    require_moderator(&actor)?;

    let entry = points::post(
        &state.db_pool,
        points::PostPoints {
            user_id: payload.user_id,
            shanyraq_id: payload.shanyraq_id,
            amount: payload.amount,
            reason: payload.reason,
            source_type: payload.source_type,
            source_id: payload.source_id,
            approved_by: Some(actor.id),
        },
    )
    .await?;

    Ok(Json(entry.map(to_response)))
}

/// Take away a positive magnitude of points as an offsetting entry.
#[axum::debug_handler]
pub async fn revoke_points(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<RevokePointsRequest>,
) -> Result<Json<Option<LedgerEntryResponse>>, AppError> {
    require_moderator(&actor)?;

    let entry = points::revoke(
        &state.db_pool,
        payload.user_id,
        payload.shanyraq_id,
        payload.amount,
        &payload.reason,
        Some(actor.id),
    )
    .await?;

    Ok(Json(entry.map(to_response)))
}

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<i64>,
}

#[axum::debug_handler]
pub async fn user_ledger(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<Vec<LedgerEntryResponse>>, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);

    let entries = campus_db::repositories::ledger::entries_for_user(&state.db_pool, user_id, limit)
        .await
        .map_err(CampusError::Database)?;

    Ok(Json(entries.into_iter().map(to_response).collect()))
}

#[derive(Debug, Deserialize)]
pub struct BreakdownQuery {
    pub shanyraq_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn contribution_breakdown(
    State(state): State<Arc<ApiState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<BreakdownQuery>,
) -> Result<Json<ContributionBreakdownResponse>, AppError> {
    let sums = points::contribution_breakdown(&state.db_pool, user_id, query.shanyraq_id).await?;

    Ok(Json(ContributionBreakdownResponse {
        user_id,
        entries: sums
            .into_iter()
            .map(|s| ContributionBreakdownEntry {
                source_type: s.source_type,
                total: s.total,
            })
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
    pub shanyraq_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn student_leaderboard(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<StudentLeaderboardResponse>, AppError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let students = points::leaderboard_students(&state.db_pool, limit, query.shanyraq_id).await?;

    Ok(Json(StudentLeaderboardResponse {
        entries: students
            .into_iter()
            .enumerate()
            .map(|(i, s)| StudentLeaderboardEntry {
                user_id: s.user_id,
                display_name: s.display_name,
                points: s.points,
                rank: i + 1,
            })
            .collect(),
    }))
}

#[axum::debug_handler]
pub async fn shanyraq_leaderboard(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ShanyraqLeaderboardResponse>, AppError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let shanyraqs = points::leaderboard_shanyraqs(&state.db_pool, limit).await?;

    Ok(Json(ShanyraqLeaderboardResponse {
        entries: shanyraqs
            .into_iter()
            .map(|s| ShanyraqResponse {
                id: s.id,
                name: s.name,
                slug: s.slug,
                total_points: s.total_points,
            })
            .collect(),
    }))
}
