use axum::{
    extract::{Path, Query, State},
    Json,
};
use campus_core::{
    errors::CampusError,
    models::event::{
        ApprovalLogResponse, CreateEventRequest, EventResponse, EventStatus, ReviewRequest,
    },
};
use campus_db::models::DbEvent;
use campus_db::services::events;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{error_handling::AppError, identity::Identity},
    ApiState,
};

fn to_response(event: DbEvent) -> EventResponse {
    EventResponse {
        id: event.id,
        title: event.title,
        description: event.description,
        start_at: event.start_at,
        end_at: event.end_at,
        location: event.location,
        status: event.status,
        awards_xp: event.awards_xp,
        created_by: event.created_by,
        rejection_comment: event.rejection_comment,
        created_at: event.created_at,
    }
}

/// Create an event in draft status, owned by the caller.
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::create_event(&state.db_pool, &actor, &payload).await?;

    Ok(Json(to_response(event)))
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub status: Option<EventStatus>,
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let status = query.status.map(|s| s.to_string());

    let events = campus_db::repositories::event::list_events(&state.db_pool, status.as_deref())
        .await
        .map_err(CampusError::Database)?;

    Ok(Json(events.into_iter().map(to_response).collect()))
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = campus_db::repositories::event::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Event with ID {} not found", id)))?;

    Ok(Json(to_response(event)))
}

/// Creator submits a draft event for approval.
#[axum::debug_handler]
pub async fn submit_event(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::submit(&state.db_pool, id, &actor).await?.into_result()?;

    Ok(Json(to_response(event)))
}

#[axum::debug_handler]
pub async fn approve_event(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::approve(&state.db_pool, id, &actor, payload.comment.as_deref())
        .await?
        .into_result()?;

    Ok(Json(to_response(event)))
}

#[axum::debug_handler]
pub async fn reject_event(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event = events::reject(&state.db_pool, id, &actor, payload.comment.as_deref())
        .await?
        .into_result()?;

    Ok(Json(to_response(event)))
}

/// Full audit trail of the event's status transitions.
#[axum::debug_handler]
pub async fn event_logs(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApprovalLogResponse>>, AppError> {
    campus_db::repositories::event::get_event_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Event with ID {} not found", id)))?;

    let logs = campus_db::repositories::event::approval_logs(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?;

    Ok(Json(
        logs.into_iter()
            .map(|log| ApprovalLogResponse {
                id: log.id,
                from_status: log.from_status,
                to_status: log.to_status,
                changed_by: log.changed_by,
                comment: log.comment,
                created_at: log.created_at,
            })
            .collect(),
    ))
}
