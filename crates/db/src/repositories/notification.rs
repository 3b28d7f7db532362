use crate::models::DbNotification;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn insert_notification(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    title: &str,
    message: &str,
    notification_type: &str,
    related_id: Option<Uuid>,
) -> Result<DbNotification> {
    let id = Uuid::new_v4();

    let notification = sqlx::query_as::<_, DbNotification>(
        r#"
        INSERT INTO notifications (id, user_id, title, message, notification_type, related_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, title, message, notification_type, is_read, related_id, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(notification_type)
    .bind(related_id)
    .fetch_one(pool)
    .await?;

    Ok(notification)
}

pub async fn notifications_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<DbNotification>> {
    let notifications = sqlx::query_as::<_, DbNotification>(
        r#"
        SELECT id, user_id, title, message, notification_type, is_read, related_id, created_at
        FROM notifications
        WHERE user_id = $1 AND (NOT $2 OR NOT is_read)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

pub async fn mark_read(pool: &Pool<Postgres>, id: Uuid, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
