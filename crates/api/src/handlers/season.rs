use axum::{
    extract::{Path, State},
    Json,
};
use campus_core::{
    errors::CampusError,
    models::season::{
        AddProgressRequest, ClaimRewardRequest, ClaimRewardResponse, CreateQuestRequest,
        CreateRewardRequest, CreateSeasonRequest, LevelResponse, ProgressResponse, Quest,
        QuestType, RewardTrackResponse, Season, SeasonReward, UserQuestProgress,
    },
};
use campus_db::models::{DbQuest, DbSeason};
use campus_db::services::season as season_service;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{require_moderator, Identity},
    },
    ApiState,
};

fn season_response(season: DbSeason) -> Season {
    Season {
        id: season.id,
        name: season.name,
        slug: season.slug,
        start_date: season.start_date,
        end_date: season.end_date,
        is_active: season.is_active,
        xp_per_level: season.xp_per_level,
        max_level: season.max_level,
    }
}

fn quest_response(quest: DbQuest) -> Result<Quest, AppError> {
    let quest_type = quest
        .quest_type
        .parse::<QuestType>()
        .map_err(|_| CampusError::Database(eyre::eyre!("Unknown quest type: {}", quest.quest_type)))?;

    Ok(Quest {
        id: quest.id,
        season_id: quest.season_id,
        quest_type,
        title: quest.title,
        target: quest.target,
        xp_reward: quest.xp_reward,
        is_active: quest.is_active,
    })
}

#[axum::debug_handler]
pub async fn create_season(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateSeasonRequest>,
) -> Result<Json<Season>, AppError> {
    require_moderator(&actor)?;

    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Name and slug are required".to_string(),
        )));
    }
    if payload.end_date <= payload.start_date {
        return Err(AppError(CampusError::Validation(
            "End date must be after start date".to_string(),
        )));
    }
    if payload.xp_per_level < 1 || payload.max_level < 1 {
        return Err(AppError(CampusError::Validation(
            "Level curve values must be positive".to_string(),
        )));
    }

    let season = campus_db::repositories::season::create_season(
        &state.db_pool,
        payload.name.trim(),
        payload.slug.trim(),
        payload.start_date,
        payload.end_date,
        payload.xp_per_level,
        payload.max_level,
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(season_response(season)))
}

/// The active season whose date window covers today.
#[axum::debug_handler]
pub async fn current_season(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Season>, AppError> {
    let season = campus_db::repositories::season::current_season(&state.db_pool)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound("No active season".to_string()))?;

    Ok(Json(season_response(season)))
}

#[axum::debug_handler]
pub async fn list_quests(
    State(state): State<Arc<ApiState>>,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Vec<Quest>>, AppError> {
    let quests = campus_db::repositories::season::quests_for_season(&state.db_pool, season_id)
        .await
        .map_err(CampusError::Database)?;

    let quests = quests
        .into_iter()
        .map(quest_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(quests))
}

#[axum::debug_handler]
pub async fn create_quest(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
    Json(payload): Json<CreateQuestRequest>,
) -> Result<Json<Quest>, AppError> {
    require_moderator(&actor)?;

    if payload.title.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Quest title is required".to_string(),
        )));
    }
    if payload.target < 1 {
        return Err(AppError(CampusError::Validation(
            "Quest target must be at least 1".to_string(),
        )));
    }
    if payload.xp_reward < 0 {
        return Err(AppError(CampusError::Validation(
            "Quest XP reward cannot be negative".to_string(),
        )));
    }

    let quest = campus_db::repositories::season::create_quest(
        &state.db_pool,
        season_id,
        &payload.quest_type.to_string(),
        payload.title.trim(),
        payload.target,
        payload.xp_reward,
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(quest_response(quest)?))
}

#[axum::debug_handler]
pub async fn create_reward(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
    Json(payload): Json<CreateRewardRequest>,
) -> Result<Json<SeasonReward>, AppError> {
    require_moderator(&actor)?;

    if payload.level < 1 {
        return Err(AppError(CampusError::Validation(
            "Reward level must be at least 1".to_string(),
        )));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Reward name is required".to_string(),
        )));
    }

    let reward = campus_db::repositories::season::create_reward(
        &state.db_pool,
        season_id,
        payload.level,
        payload.name.trim(),
        &payload.reward_type.to_string(),
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(SeasonReward {
        id: reward.id,
        season_id: reward.season_id,
        level: reward.level,
        name: reward.name,
        reward_type: reward.reward_type,
    }))
}

/// Advance the caller's progress on a quest. The completion flag is true
/// only on the call that first reaches the target.
#[axum::debug_handler]
pub async fn add_progress(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(quest_id): Path<Uuid>,
    Json(payload): Json<AddProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    let quest = campus_db::repositories::season::get_quest_by_id(&state.db_pool, quest_id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Quest with ID {} not found", quest_id)))?;

    let (progress, completed) =
        season_service::add_progress(&state.db_pool, actor.id, quest_id, payload.amount).await?;

    Ok(Json(ProgressResponse {
        quest_id,
        current_progress: progress.current_progress,
        target: quest.target,
        completed,
        completed_at: progress.completed_at,
    }))
}

/// The caller's progress on every quest of the season.
#[axum::debug_handler]
pub async fn user_progress(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Vec<UserQuestProgress>>, AppError> {
    let rows =
        campus_db::repositories::season::progress_for_user(&state.db_pool, actor.id, season_id)
            .await
            .map_err(CampusError::Database)?;

    Ok(Json(
        rows.into_iter()
            .map(|p| UserQuestProgress {
                id: p.id,
                user_id: p.user_id,
                quest_id: p.quest_id,
                current_progress: p.current_progress,
                completed_at: p.completed_at,
            })
            .collect(),
    ))
}

/// The caller's level and progress within it for the season.
#[axum::debug_handler]
pub async fn user_level(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
) -> Result<Json<LevelResponse>, AppError> {
    let (xp, level, into_level, per_level) =
        season_service::user_level(&state.db_pool, actor.id, season_id).await?;

    Ok(Json(LevelResponse {
        season_id,
        xp,
        level,
        xp_into_level: into_level,
        xp_per_level: per_level,
    }))
}

/// Claim the reward at the given level. A second claim is denied.
#[axum::debug_handler]
pub async fn claim_reward(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
    Json(payload): Json<ClaimRewardRequest>,
) -> Result<Json<ClaimRewardResponse>, AppError> {
    let claim = season_service::claim_reward(&state.db_pool, actor.id, season_id, payload.level)
        .await?
        .into_result()?;

    let reward =
        campus_db::repositories::season::get_reward(&state.db_pool, season_id, payload.level)
            .await
            .map_err(CampusError::Database)?
            .ok_or_else(|| {
                CampusError::NotFound(format!("No reward at level {}", payload.level))
            })?;

    Ok(Json(ClaimRewardResponse {
        reward_id: reward.id,
        level: reward.level,
        name: reward.name,
        claimed_at: claim.claimed_at,
    }))
}

/// The season's reward track annotated with the caller's claim status.
#[axum::debug_handler]
pub async fn reward_track(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(season_id): Path<Uuid>,
) -> Result<Json<RewardTrackResponse>, AppError> {
    let rewards = season_service::reward_track(&state.db_pool, actor.id, season_id).await?;

    Ok(Json(RewardTrackResponse {
        season_id,
        rewards,
    }))
}
