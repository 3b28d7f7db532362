//! Season progress engine: quest progress with exactly-once completion,
//! level derivation from the season XP cache, and exactly-once reward
//! claims.

use campus_core::errors::{CampusError, CampusResult};
use campus_core::models::ledger::SourceType;
use campus_core::models::notification::NotificationType;
use campus_core::models::season::RewardTrackEntry;
use campus_core::season::{advance_progress, LevelCurve};
use campus_core::workflow::Outcome;
use chrono::Utc;
use eyre::eyre;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbQuest, DbQuestProgress, DbSeason, DbUser, DbUserReward};
use crate::repositories;
use crate::services::{notify, points};

async fn load_season(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbSeason> {
    repositories::season::get_season_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Season with ID {} not found", id)))
}

async fn load_quest(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbQuest> {
    repositories::season::get_quest_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Quest with ID {} not found", id)))
}

async fn load_user(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbUser> {
    repositories::user::get_user_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", id)))
}

fn curve_for(season: &DbSeason) -> LevelCurve {
    LevelCurve::new(
        u32::try_from(season.xp_per_level).unwrap_or(1),
        u32::try_from(season.max_level).unwrap_or(1),
    )
}

fn season_xp(user: &DbUser) -> u32 {
    u32::try_from(user.season_points.max(0)).unwrap_or(u32::MAX)
}

/// Add progress to a quest. A completed quest is a no-op returning
/// `completed = false`; otherwise progress is clamped at the target and
/// the completion signal fires on exactly the call that first reaches it.
/// Completion posts the quest's XP reward to the ledger in the same
/// transaction as the progress write.
pub async fn add_progress(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    quest_id: Uuid,
    amount: i32,
) -> CampusResult<(DbQuestProgress, bool)> {
    if amount < 1 {
        return Err(CampusError::Validation(
            "Progress amount must be positive".to_string(),
        ));
    }

    load_user(pool, user_id).await?;
    let quest = load_quest(pool, quest_id).await?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let progress = repositories::season::get_or_create_progress(&mut tx, user_id, quest_id)
        .await
        .map_err(CampusError::Database)?;

    if progress.completed_at.is_some() {
        return Ok((progress, false));
    }

    let (next, completed) = advance_progress(progress.current_progress, amount, quest.target);
    let completed_at = completed.then(Utc::now);

    let updated = repositories::season::update_progress(&mut tx, progress.id, next, completed_at)
        .await
        .map_err(CampusError::Database)?;

    if completed {
        points::post_on(
            &mut tx,
            points::PostPoints {
                user_id,
                shanyraq_id: None,
                amount: quest.xp_reward,
                reason: format!("Quest completed: {}", quest.title),
                source_type: SourceType::Activity,
                source_id: Some(quest.id),
                approved_by: None,
            },
        )
        .await
        .map_err(CampusError::Database)?;
    }

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    if completed {
        notify::emit(
            pool,
            user_id,
            NotificationType::QuestCompleted,
            "Quest completed",
            &format!("\"{}\" completed (+{} XP)", quest.title, quest.xp_reward),
            Some(quest.id),
        )
        .await;
    }

    Ok((updated, completed))
}

/// The user's level and progress within it, derived from the season XP
/// cache (itself a projection of the ledger).
pub async fn user_level(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    season_id: Uuid,
) -> CampusResult<(i64, u32, u32, u32)> {
    let user = load_user(pool, user_id).await?;
    let season = load_season(pool, season_id).await?;

    let curve = curve_for(&season);
    let xp = season_xp(&user);
    let level = curve.level_for(xp);
    let (into_level, per_level) = curve.progress_within(xp);

    Ok((user.season_points.max(0), level, into_level, per_level))
}

/// Claim the reward at `level`. Requires the level to be reached; the
/// (user, reward) uniqueness constraint makes the claim exactly-once.
pub async fn claim_reward(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    season_id: Uuid,
    level: i32,
) -> CampusResult<Outcome<DbUserReward>> {
    let user = load_user(pool, user_id).await?;
    let season = load_season(pool, season_id).await?;

    let reward = repositories::season::get_reward(pool, season_id, level)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| {
            CampusError::NotFound(format!("No reward at level {} for this season", level))
        })?;

    let curve = curve_for(&season);
    let user_level = curve.level_for(season_xp(&user)) as i32;
    if reward.level > user_level {
        return Ok(Outcome::denied("Level too low"));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let claim = repositories::season::try_claim_reward(&mut conn, user_id, reward.id)
        .await
        .map_err(CampusError::Database)?;

    let Some(claim) = claim else {
        return Ok(Outcome::denied("Already claimed"));
    };

    notify::emit(
        pool,
        user_id,
        NotificationType::RewardClaimed,
        "Reward claimed",
        &format!("Claimed \"{}\" (level {})", reward.name, reward.level),
        Some(reward.id),
    )
    .await;

    Ok(Outcome::Applied(claim))
}

/// The season's reward track annotated with the viewer's claim status.
pub async fn reward_track(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    season_id: Uuid,
) -> CampusResult<Vec<RewardTrackEntry>> {
    let user = load_user(pool, user_id).await?;
    let season = load_season(pool, season_id).await?;

    let rewards = repositories::season::rewards_for_season(pool, season_id)
        .await
        .map_err(CampusError::Database)?;
    let claimed = repositories::season::claimed_reward_ids(pool, user_id, season_id)
        .await
        .map_err(CampusError::Database)?;

    let curve = curve_for(&season);
    let user_level = curve.level_for(season_xp(&user)) as i32;

    let track = rewards
        .into_iter()
        .map(|reward| {
            let is_claimed = claimed.contains(&reward.id);
            RewardTrackEntry {
                reward_id: reward.id,
                level: reward.level,
                name: reward.name,
                reward_type: reward.reward_type,
                claimed: is_claimed,
                can_claim: reward.level <= user_level && !is_claimed,
                locked: reward.level > user_level,
            }
        })
        .collect();

    Ok(track)
}
