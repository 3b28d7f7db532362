use crate::models::{DbQuest, DbQuestProgress, DbSeason, DbSeasonReward, DbUserReward};
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_season(
    pool: &Pool<Postgres>,
    name: &str,
    slug: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    xp_per_level: i32,
    max_level: i32,
) -> Result<DbSeason> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating season: id={}, slug={}", id, slug);

    let season = sqlx::query_as::<_, DbSeason>(
        r#"
        INSERT INTO seasons (id, name, slug, start_date, end_date, xp_per_level, max_level)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, name, slug, start_date, end_date, is_active, xp_per_level, max_level, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .bind(start_date)
    .bind(end_date)
    .bind(xp_per_level)
    .bind(max_level)
    .fetch_one(pool)
    .await?;

    Ok(season)
}

pub async fn get_season_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSeason>> {
    let season = sqlx::query_as::<_, DbSeason>(
        r#"
        SELECT id, name, slug, start_date, end_date, is_active, xp_per_level, max_level, created_at
        FROM seasons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(season)
}

/// The active season whose date window covers today.
pub async fn current_season(pool: &Pool<Postgres>) -> Result<Option<DbSeason>> {
    let season = sqlx::query_as::<_, DbSeason>(
        r#"
        SELECT id, name, slug, start_date, end_date, is_active, xp_per_level, max_level, created_at
        FROM seasons
        WHERE is_active AND start_date <= CURRENT_DATE AND end_date >= CURRENT_DATE
        ORDER BY start_date DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(season)
}

pub async fn create_quest(
    pool: &Pool<Postgres>,
    season_id: Uuid,
    quest_type: &str,
    title: &str,
    target: i32,
    xp_reward: i64,
) -> Result<DbQuest> {
    let id = Uuid::new_v4();

    let quest = sqlx::query_as::<_, DbQuest>(
        r#"
        INSERT INTO quests (id, season_id, quest_type, title, target, xp_reward)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, season_id, quest_type, title, target, xp_reward, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(season_id)
    .bind(quest_type)
    .bind(title)
    .bind(target)
    .bind(xp_reward)
    .fetch_one(pool)
    .await?;

    Ok(quest)
}

pub async fn get_quest_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbQuest>> {
    let quest = sqlx::query_as::<_, DbQuest>(
        r#"
        SELECT id, season_id, quest_type, title, target, xp_reward, is_active, created_at
        FROM quests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(quest)
}

pub async fn quests_for_season(pool: &Pool<Postgres>, season_id: Uuid) -> Result<Vec<DbQuest>> {
    let quests = sqlx::query_as::<_, DbQuest>(
        r#"
        SELECT id, season_id, quest_type, title, target, xp_reward, is_active, created_at
        FROM quests
        WHERE season_id = $1 AND is_active
        ORDER BY quest_type ASC, created_at ASC
        "#,
    )
    .bind(season_id)
    .fetch_all(pool)
    .await?;

    Ok(quests)
}

/// Fetch the user's progress row for a quest, creating a zero row on first
/// touch.
pub async fn get_or_create_progress(
    conn: &mut PgConnection,
    user_id: Uuid,
    quest_id: Uuid,
) -> Result<DbQuestProgress> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO user_quest_progress (id, user_id, quest_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, quest_id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(quest_id)
    .execute(&mut *conn)
    .await?;

    let progress = sqlx::query_as::<_, DbQuestProgress>(
        r#"
        SELECT id, user_id, quest_id, current_progress, completed_at, created_at, updated_at
        FROM user_quest_progress
        WHERE user_id = $1 AND quest_id = $2
        "#,
    )
    .bind(user_id)
    .bind(quest_id)
    .fetch_one(conn)
    .await?;

    Ok(progress)
}

pub async fn update_progress(
    conn: &mut PgConnection,
    id: Uuid,
    current_progress: i32,
    completed_at: Option<DateTime<Utc>>,
) -> Result<DbQuestProgress> {
    let progress = sqlx::query_as::<_, DbQuestProgress>(
        r#"
        UPDATE user_quest_progress
        SET current_progress = $2,
            completed_at = COALESCE(completed_at, $3),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, quest_id, current_progress, completed_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(current_progress)
    .bind(completed_at)
    .fetch_one(conn)
    .await?;

    Ok(progress)
}

pub async fn progress_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Vec<DbQuestProgress>> {
    let progress = sqlx::query_as::<_, DbQuestProgress>(
        r#"
        SELECT p.id, p.user_id, p.quest_id, p.current_progress, p.completed_at, p.created_at, p.updated_at
        FROM user_quest_progress p
        JOIN quests q ON q.id = p.quest_id
        WHERE p.user_id = $1 AND q.season_id = $2
        ORDER BY p.updated_at DESC
        "#,
    )
    .bind(user_id)
    .bind(season_id)
    .fetch_all(pool)
    .await?;

    Ok(progress)
}

pub async fn create_reward(
    pool: &Pool<Postgres>,
    season_id: Uuid,
    level: i32,
    name: &str,
    reward_type: &str,
) -> Result<DbSeasonReward> {
    let id = Uuid::new_v4();

    let reward = sqlx::query_as::<_, DbSeasonReward>(
        r#"
        INSERT INTO season_rewards (id, season_id, level, name, reward_type)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, season_id, level, name, reward_type
        "#,
    )
    .bind(id)
    .bind(season_id)
    .bind(level)
    .bind(name)
    .bind(reward_type)
    .fetch_one(pool)
    .await?;

    Ok(reward)
}

pub async fn get_reward(
    pool: &Pool<Postgres>,
    season_id: Uuid,
    level: i32,
) -> Result<Option<DbSeasonReward>> {
    let reward = sqlx::query_as::<_, DbSeasonReward>(
        r#"
        SELECT id, season_id, level, name, reward_type
        FROM season_rewards
        WHERE season_id = $1 AND level = $2
        "#,
    )
    .bind(season_id)
    .bind(level)
    .fetch_optional(pool)
    .await?;

    Ok(reward)
}

pub async fn rewards_for_season(
    pool: &Pool<Postgres>,
    season_id: Uuid,
) -> Result<Vec<DbSeasonReward>> {
    let rewards = sqlx::query_as::<_, DbSeasonReward>(
        r#"
        SELECT id, season_id, level, name, reward_type
        FROM season_rewards
        WHERE season_id = $1
        ORDER BY level ASC
        "#,
    )
    .bind(season_id)
    .fetch_all(pool)
    .await?;

    Ok(rewards)
}

/// Claim a reward exactly once. The (user, reward) uniqueness constraint
/// settles races; None means an earlier claim already exists.
pub async fn try_claim_reward(
    conn: &mut PgConnection,
    user_id: Uuid,
    season_reward_id: Uuid,
) -> Result<Option<DbUserReward>> {
    let id = Uuid::new_v4();

    let claim = sqlx::query_as::<_, DbUserReward>(
        r#"
        INSERT INTO user_rewards (id, user_id, season_reward_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, season_reward_id) DO NOTHING
        RETURNING id, user_id, season_reward_id, claimed_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(season_reward_id)
    .fetch_optional(conn)
    .await?;

    Ok(claim)
}

pub async fn claimed_reward_ids(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    season_id: Uuid,
) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT r.season_reward_id
        FROM user_rewards r
        JOIN season_rewards sr ON sr.id = r.season_reward_id
        WHERE r.user_id = $1 AND sr.season_id = $2
        "#,
    )
    .bind(user_id)
    .bind(season_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
