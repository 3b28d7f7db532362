use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use campus_core::{
    errors::CampusError,
    models::booking::{
        AvailabilityQuery, AvailabilityResponse, BookingResponse, CreateBookingRequest,
        CreateBookingResponse, CreateSpaceRequest, SlotSuggestion, SpaceResponse, SuggestQuery,
        SuggestResponse,
    },
    models::event::{ApprovalLogResponse, ReviewRequest},
};
use campus_db::models::{DbSpace, DbSpaceBooking};
use campus_db::services::bookings::{self, BookingCreation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{
        error_handling::AppError,
        identity::{require_moderator, Identity},
    },
    ApiState,
};

fn space_response(space: DbSpace) -> SpaceResponse {
    SpaceResponse {
        id: space.id,
        name: space.name,
        space_type: space.space_type,
        capacity: space.capacity,
        location: space.location,
        is_active: space.is_active,
    }
}

fn booking_response(booking: DbSpaceBooking) -> BookingResponse {
    BookingResponse {
        id: booking.id,
        space_id: booking.space_id,
        booked_by: booking.booked_by,
        start_time: booking.start_time,
        end_time: booking.end_time,
        purpose: booking.purpose,
        attendees_count: booking.attendees_count,
        status: booking.status,
        rejection_reason: booking.rejection_reason,
        created_at: booking.created_at,
    }
}

#[axum::debug_handler]
pub async fn create_space(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateSpaceRequest>,
) -> Result<Json<SpaceResponse>, AppError> {
    require_moderator(&actor)?;

    if payload.name.trim().is_empty() {
        return Err(AppError(CampusError::Validation(
            "Space name is required".to_string(),
        )));
    }
    if payload.capacity < 0 {
        return Err(AppError(CampusError::Validation(
            "Capacity cannot be negative".to_string(),
        )));
    }

    let space = campus_db::repositories::space::create_space(
        &state.db_pool,
        payload.name.trim(),
        &payload.space_type.to_string(),
        payload.capacity,
        &payload.location,
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(Json(space_response(space)))
}

#[axum::debug_handler]
pub async fn list_spaces(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SpaceResponse>>, AppError> {
    let spaces = campus_db::repositories::space::list_spaces(&state.db_pool)
        .await
        .map_err(CampusError::Database)?;

    Ok(Json(spaces.into_iter().map(space_response).collect()))
}

#[axum::debug_handler]
pub async fn get_space(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpaceResponse>, AppError> {
    let space = campus_db::repositories::space::get_space_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Space with ID {} not found", id)))?;

    Ok(Json(space_response(space)))
}

/// Create a booking request for a space. A conflicting span returns 409
/// with the blocking bookings instead of a new row.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(space_id): Path<Uuid>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let creation = bookings::create_booking(&state.db_pool, &actor, space_id, &payload).await?;

    match creation {
        BookingCreation::Created(booking) => Ok((
            StatusCode::CREATED,
            Json(CreateBookingResponse {
                booking: Some(booking_response(booking)),
                conflicts: Vec::new(),
                error: None,
            }),
        )),
        BookingCreation::Conflicted(conflicts) => Ok((
            StatusCode::CONFLICT,
            Json(CreateBookingResponse {
                booking: None,
                error: Some(format!(
                    "Time slot conflicts with {} existing booking(s)",
                    conflicts.len()
                )),
                conflicts: conflicts.into_iter().map(booking_response).collect(),
            }),
        )),
    }
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = campus_db::repositories::space::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Booking with ID {} not found", id)))?;

    Ok(Json(booking_response(booking)))
}

#[axum::debug_handler]
pub async fn approve_booking(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::approve(&state.db_pool, id, &actor, payload.comment.as_deref())
        .await?
        .into_result()?;

    Ok(Json(booking_response(booking)))
}

#[axum::debug_handler]
pub async fn reject_booking(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::reject(&state.db_pool, id, &actor, payload.comment.as_deref())
        .await?
        .into_result()?;

    Ok(Json(booking_response(booking)))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = bookings::cancel(&state.db_pool, id, &actor, payload.comment.as_deref())
        .await?
        .into_result()?;

    Ok(Json(booking_response(booking)))
}

/// Is the span free, and which bookings block it if not.
#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    Path(space_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let conflicts =
        bookings::availability(&state.db_pool, space_id, query.start_time, query.end_time).await?;

    Ok(Json(AvailabilityResponse {
        available: conflicts.is_empty(),
        conflicts: conflicts.into_iter().map(booking_response).collect(),
    }))
}

/// Conflict-free slots of the requested duration inside working hours.
#[axum::debug_handler]
pub async fn suggest_slots(
    State(state): State<Arc<ApiState>>,
    Path(space_id): Path<Uuid>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    let slots = bookings::suggest_slots(
        &state.db_pool,
        space_id,
        query.date,
        query.duration_hours,
        query.count,
    )
    .await?;

    Ok(Json(SuggestResponse {
        suggestions: slots
            .into_iter()
            .map(|slot| SlotSuggestion {
                start: slot.start,
                end: slot.end,
            })
            .collect(),
    }))
}

#[derive(Debug, serde::Deserialize)]
pub struct WeekQuery {
    pub week_start: chrono::NaiveDate,
}

/// The approved schedule of a space for one week.
#[axum::debug_handler]
pub async fn week_schedule(
    State(state): State<Arc<ApiState>>,
    Path(space_id): Path<Uuid>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = bookings::week_schedule(&state.db_pool, space_id, query.week_start).await?;

    Ok(Json(bookings.into_iter().map(booking_response).collect()))
}

/// Full audit trail of the booking's status transitions.
#[axum::debug_handler]
pub async fn booking_logs(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApprovalLogResponse>>, AppError> {
    campus_db::repositories::space::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Booking with ID {} not found", id)))?;

    let logs = campus_db::repositories::space::booking_logs(&state.db_pool, id)
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
