use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use campus_core::{errors::CampusError, models::notification::NotificationResponse};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{error_handling::AppError, identity::Identity},
    ApiState,
};

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

/// The caller's notifications, newest first.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = campus_db::repositories::notification::notifications_for_user(
        &state.db_pool,
        actor.id,
        query.unread_only,
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(
        notifications
            .into_iter()
            .map(|n| NotificationResponse {
                id: n.id,
                title: n.title,
                message: n.message,
                notification_type: n.notification_type,
                is_read: n.is_read,
                related_id: n.related_id,
                created_at: n.created_at,
            })
            .collect(),
    ))
}

/// Mark one of the caller's notifications as read.
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let updated = campus_db::repositories::notification::mark_read(&state.db_pool, id, actor.id)
        .await
        .map_err(CampusError::Database)?;

    if updated == 0 {
        return Err(AppError(CampusError::NotFound(format!(
            "Notification with ID {} not found",
            id
        ))));
    }

    Ok(StatusCode::NO_CONTENT)
}
