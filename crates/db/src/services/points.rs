//! Points ledger service: atomic post/revoke, cache recalculation, and
//! leaderboard queries. The ledger is the sole source of truth; the cached
//! user balances and shanyraq totals are projections of it.

use campus_core::errors::{CampusError, CampusResult};
use campus_core::models::ledger::SourceType;
use chrono::NaiveTime;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbLedgerEntry, DbShanyraq, DbSourceSum, DbStudentPoints};
use crate::repositories;

/// A ledger post: who, how much, and why.
#[derive(Debug, Clone)]
pub struct PostPoints {
    pub user_id: Uuid,
    /// Explicit group to post against; None resolves to the user's current
    /// group.
    pub shanyraq_id: Option<Uuid>,
    /// Signed delta: positive = credit, negative = debit/penalty.
    pub amount: i64,
    pub reason: String,
    pub source_type: SourceType,
    pub source_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
}

/// Post a signed point delta for a user. A zero amount is a no-op, not an
/// error. The entry insert, the user balance bump, and the group total
/// recompute land in one transaction or not at all.
pub async fn post(pool: &Pool<Postgres>, post: PostPoints) -> CampusResult<Option<DbLedgerEntry>> {
    if post.amount == 0 {
        return Ok(None);
    }

    repositories::user::get_user_by_id(pool, post.user_id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", post.user_id)))?;

    if let Some(shanyraq_id) = post.shanyraq_id {
        repositories::shanyraq::get_shanyraq_by_id(pool, shanyraq_id)
            .await
            .map_err(CampusError::Database)?
            .ok_or_else(|| {
                CampusError::NotFound(format!("Shanyraq with ID {} not found", shanyraq_id))
            })?;
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let entry = post_on(&mut tx, post).await.map_err(CampusError::Database)?;

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    Ok(entry)
}

/// Transaction-scoped post body, shared with workflows that fold a ledger
/// post into their own atomic unit (e.g. quest completion).
pub async fn post_on(
    conn: &mut PgConnection,
    post: PostPoints,
) -> Result<Option<DbLedgerEntry>> {
    if post.amount == 0 {
        return Ok(None);
    }

    let shanyraq_id = match post.shanyraq_id {
        Some(id) => Some(id),
        None => repositories::shanyraq::current_shanyraq_id(&mut *conn, post.user_id).await?,
    };

    let entry = repositories::ledger::insert_entry(
        &mut *conn,
        post.user_id,
        shanyraq_id,
        post.amount,
        &post.reason,
        &post.source_type.to_string(),
        post.source_id,
        post.approved_by,
    )
    .await?;

    repositories::user::adjust_cached_points(&mut *conn, post.user_id, post.amount).await?;

    if let Some(shanyraq_id) = shanyraq_id {
        recalculate_on(&mut *conn, shanyraq_id).await?;
    }

    Ok(Some(entry))
}

/// Revoke (take away) points. The magnitude must be positive; the ledger
/// records the offsetting negative entry.
pub async fn revoke(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    shanyraq_id: Option<Uuid>,
    amount: i64,
    reason: &str,
    approved_by: Option<Uuid>,
) -> CampusResult<Option<DbLedgerEntry>> {
    if amount <= 0 {
        return Err(CampusError::Validation(
            "Revoke amount must be positive".to_string(),
        ));
    }

    let reason = if reason.trim().is_empty() {
        "Revoked"
    } else {
        reason
    };

    post(
        pool,
        PostPoints {
            user_id,
            shanyraq_id,
            amount: -amount,
            reason: reason.to_string(),
            source_type: SourceType::Admin,
            source_id: None,
            approved_by,
        },
    )
    .await
}

/// Set the group's cached total to the clamped ledger sum. Idempotent and
/// the only sanctioned writer of `total_points`.
pub async fn recalculate_on(conn: &mut PgConnection, shanyraq_id: Uuid) -> Result<i64> {
    let total = repositories::ledger::sum_for_shanyraq(&mut *conn, shanyraq_id).await?;
    let clamped = total.max(0);
    repositories::shanyraq::set_total_points(&mut *conn, shanyraq_id, clamped).await?;
    Ok(clamped)
}

pub async fn recalculate_shanyraq_total(
    pool: &Pool<Postgres>,
    shanyraq_id: Uuid,
) -> CampusResult<i64> {
    repositories::shanyraq::get_shanyraq_by_id(pool, shanyraq_id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| {
            CampusError::NotFound(format!("Shanyraq with ID {} not found", shanyraq_id))
        })?;

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let total = recalculate_on(&mut conn, shanyraq_id)
        .await
        .map_err(CampusError::Database)?;

    Ok(total)
}

/// Disaster-recovery recompute: every group independently, no cross-group
/// coupling.
pub async fn recalculate_all_totals(pool: &Pool<Postgres>) -> CampusResult<usize> {
    let ids = repositories::shanyraq::list_shanyraq_ids(pool)
        .await
        .map_err(CampusError::Database)?;

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let count = ids.len();
    for shanyraq_id in ids {
        recalculate_on(&mut conn, shanyraq_id)
            .await
            .map_err(CampusError::Database)?;
    }

    tracing::info!("Recalculated totals for {} shanyraqs", count);
    Ok(count)
}

/// Restore a user's cached balances from the ledger: lifetime is the full
/// sum, season is the sum inside the current season's date window.
pub async fn recalculate_user_points(pool: &Pool<Postgres>, user_id: Uuid) -> CampusResult<()> {
    repositories::user::get_user_by_id(pool, user_id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", user_id)))?;

    let season = repositories::season::current_season(pool)
        .await
        .map_err(CampusError::Database)?;

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let lifetime = repositories::ledger::sum_for_user(&mut conn, user_id)
        .await
        .map_err(CampusError::Database)?;

    let season_total = match season {
        Some(season) => {
            let midnight = NaiveTime::MIN;
            let from = season.start_date.and_time(midnight).and_utc();
            let to = (season.end_date + chrono::Duration::days(1))
                .and_time(midnight)
                .and_utc();
            repositories::ledger::sum_for_user_between(&mut conn, user_id, from, to)
                .await
                .map_err(CampusError::Database)?
        }
        None => 0,
    };

    repositories::user::set_cached_points(&mut conn, user_id, lifetime, season_total)
        .await
        .map_err(CampusError::Database)?;

    Ok(())
}

pub async fn leaderboard_students(
    pool: &Pool<Postgres>,
    limit: i64,
    shanyraq_id: Option<Uuid>,
) -> CampusResult<Vec<DbStudentPoints>> {
    let students = repositories::shanyraq::top_students(pool, limit, shanyraq_id)
        .await
        .map_err(CampusError::Database)?;

    Ok(students)
}

pub async fn leaderboard_shanyraqs(
    pool: &Pool<Postgres>,
    limit: i64,
) -> CampusResult<Vec<DbShanyraq>> {
    let shanyraqs = repositories::shanyraq::top_shanyraqs(pool, limit)
        .await
        .map_err(CampusError::Database)?;

    Ok(shanyraqs)
}

pub async fn contribution_breakdown(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    shanyraq_id: Option<Uuid>,
) -> CampusResult<Vec<DbSourceSum>> {
    let sums = repositories::ledger::breakdown_for_user(pool, user_id, shanyraq_id)
        .await
        .map_err(CampusError::Database)?;

    Ok(sums)
}
