use campus_core::models::notification::NotificationType;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::repositories;

/// Fire-and-forget notification emit. Delivery is the sink's concern; a
/// failed insert is logged and never propagates into the workflow that
/// triggered it.
pub async fn emit(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    notification_type: NotificationType,
    title: &str,
    message: &str,
    related_id: Option<Uuid>,
) {
    let kind = notification_type.to_string();
    if let Err(err) = repositories::notification::insert_notification(
        pool, user_id, title, message, &kind, related_id,
    )
    .await
    {
        tracing::warn!(
            "Failed to emit {} notification for user {}: {}",
            kind,
            user_id,
            err
        );
    }
}
