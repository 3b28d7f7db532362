use crate::models::{DbLedgerEntry, DbSourceSum};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

/// Append one immutable ledger entry. There is no update or delete path;
/// corrections are new offsetting entries.
#[allow(clippy::too_many_arguments)]
pub async fn insert_entry(
    conn: &mut PgConnection,
    user_id: Uuid,
    shanyraq_id: Option<Uuid>,
    amount: i64,
    reason: &str,
    source_type: &str,
    source_id: Option<Uuid>,
    approved_by: Option<Uuid>,
) -> Result<DbLedgerEntry> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Posting ledger entry: id={}, user={}, amount={:+}",
        id,
        user_id,
        amount
    );

    let entry = sqlx::query_as::<_, DbLedgerEntry>(
        r#"
        INSERT INTO point_ledger (id, user_id, shanyraq_id, amount, reason, source_type, source_id, approved_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, shanyraq_id, amount, reason, source_type, source_id, approved_by, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(shanyraq_id)
    .bind(amount)
    .bind(reason)
    .bind(source_type)
    .bind(source_id)
    .bind(approved_by)
    .fetch_one(conn)
    .await?;

    Ok(entry)
}

pub async fn sum_for_shanyraq(conn: &mut PgConnection, shanyraq_id: Uuid) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM point_ledger
        WHERE shanyraq_id = $1
        "#,
    )
    .bind(shanyraq_id)
    .fetch_one(conn)
    .await?;

    Ok(total)
}

pub async fn sum_for_user(conn: &mut PgConnection, user_id: Uuid) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM point_ledger
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await?;

    Ok(total)
}

pub async fn sum_for_user_between(
    conn: &mut PgConnection,
    user_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM point_ledger
        WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_one(conn)
    .await?;

    Ok(total)
}

pub async fn entries_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<DbLedgerEntry>> {
    let entries = sqlx::query_as::<_, DbLedgerEntry>(
        r#"
        SELECT id, user_id, shanyraq_id, amount, reason, source_type, source_id, approved_by, created_at
        FROM point_ledger
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Sum of a user's entries grouped by source type, optionally scoped to
/// one shanyraq.
pub async fn breakdown_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    shanyraq_id: Option<Uuid>,
) -> Result<Vec<DbSourceSum>> {
    let sums = sqlx::query_as::<_, DbSourceSum>(
        r#"
        SELECT source_type, COALESCE(SUM(amount), 0) AS total
        FROM point_ledger
        WHERE user_id = $1 AND ($2::uuid IS NULL OR shanyraq_id = $2)
        GROUP BY source_type
        ORDER BY source_type ASC
        "#,
    )
    .bind(user_id)
    .bind(shanyraq_id)
    .fetch_all(pool)
    .await?;

    Ok(sums)
}
