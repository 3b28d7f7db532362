use crate::models::{DbEvent, DbEventApprovalLog};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub async fn create_event(
    pool: &Pool<Postgres>,
    title: &str,
    description: &str,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    location: &str,
    awards_xp: i64,
    created_by: Uuid,
) -> Result<DbEvent> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating event: id={}, title={}", id, title);

    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        INSERT INTO events (id, title, description, start_at, end_at, location, awards_xp, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, description, start_at, end_at, location, status, awards_xp,
                  created_by, rejection_comment, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(start_at)
    .bind(end_at)
    .bind(location)
    .bind(awards_xp)
    .bind(created_by)
    .fetch_one(pool)
    .await?;

    Ok(event)
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, title, description, start_at, end_at, location, status, awards_xp,
               created_by, rejection_comment, created_at, updated_at
        FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(event)
}

pub async fn list_events(pool: &Pool<Postgres>, status: Option<&str>) -> Result<Vec<DbEvent>> {
    let events = sqlx::query_as::<_, DbEvent>(
        r#"
        SELECT id, title, description, start_at, end_at, location, status, awards_xp,
               created_by, rejection_comment, created_at, updated_at
        FROM events
        WHERE $1::varchar IS NULL OR status = $1
        ORDER BY start_at DESC
        "#,
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Compare-and-swap status update: the row moves only if it still carries
/// the expected status. Returns None when a concurrent writer got there
/// first. A non-null rejection comment overwrites the stored one (approval
/// passes an empty string to clear it).
pub async fn transition_status(
    conn: &mut PgConnection,
    id: Uuid,
    expected: &str,
    to: &str,
    rejection_comment: Option<&str>,
) -> Result<Option<DbEvent>> {
    let event = sqlx::query_as::<_, DbEvent>(
        r#"
        UPDATE events
        SET status = $3,
            rejection_comment = COALESCE($4, rejection_comment),
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, title, description, start_at, end_at, location, status, awards_xp,
                  created_by, rejection_comment, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(to)
    .bind(rejection_comment)
    .fetch_optional(conn)
    .await?;

    Ok(event)
}

pub async fn insert_approval_log(
    conn: &mut PgConnection,
    event_id: Uuid,
    from_status: &str,
    to_status: &str,
    changed_by: Uuid,
    comment: &str,
) -> Result<DbEventApprovalLog> {
    let id = Uuid::new_v4();

    let log = sqlx::query_as::<_, DbEventApprovalLog>(
        r#"
        INSERT INTO event_approval_logs (id, event_id, from_status, to_status, changed_by, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, event_id, from_status, to_status, changed_by, comment, created_at
        "#,
    )
    .bind(id)
    .bind(event_id)
    .bind(from_status)
    .bind(to_status)
    .bind(changed_by)
    .bind(comment)
    .fetch_one(conn)
    .await?;

    Ok(log)
}

pub async fn approval_logs(pool: &Pool<Postgres>, event_id: Uuid) -> Result<Vec<DbEventApprovalLog>> {
    let logs = sqlx::query_as::<_, DbEventApprovalLog>(
        r#"
        SELECT id, event_id, from_status, to_status, changed_by, comment, created_at
        FROM event_approval_logs
        WHERE event_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}
