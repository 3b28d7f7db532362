//! Space booking workflow: conflict-checked creation, approval with a
//! re-check against approved bookings, rejection, cancellation, and slot
//! suggestions.

use campus_core::conflict::{self, Interval, DEFAULT_MAX_SUGGESTIONS};
use campus_core::errors::{CampusError, CampusResult};
use campus_core::models::booking::{BookingStatus, CreateBookingRequest};
use campus_core::models::principal::Principal;
use campus_core::workflow::{booking_workflow, Outcome};
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::eyre;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbSpace, DbSpaceBooking};
use crate::repositories;

/// Result of a booking creation attempt: either the new pending booking or
/// the bookings that already occupy the requested span.
#[derive(Debug)]
pub enum BookingCreation {
    Created(DbSpaceBooking),
    Conflicted(Vec<DbSpaceBooking>),
}

fn parse_status(raw: &str) -> CampusResult<BookingStatus> {
    raw.parse::<BookingStatus>()
        .map_err(|_| CampusError::Database(eyre!("Unknown booking status: {}", raw)))
}

async fn load_space(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbSpace> {
    repositories::space::get_space_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Space with ID {} not found", id)))
}

async fn load_booking(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbSpaceBooking> {
    repositories::space::get_booking_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Booking with ID {} not found", id)))
}

/// Create a booking request. Input invariants (time window, capacity) are
/// rejected before any write; a conflicting span returns the blocking
/// bookings instead of a new row. The booking and its initial audit-log
/// entry land together.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    actor: &Principal,
    space_id: Uuid,
    req: &CreateBookingRequest,
) -> CampusResult<BookingCreation> {
    let space = load_space(pool, space_id).await?;

    if req.end_time <= req.start_time {
        return Err(CampusError::Validation(
            "End time must be after start time".to_string(),
        ));
    }
    if req.start_time < Utc::now() {
        return Err(CampusError::Validation(
            "Cannot book in the past".to_string(),
        ));
    }
    if req.attendees_count < 1 {
        return Err(CampusError::Validation(
            "Attendee count must be at least 1".to_string(),
        ));
    }
    if space.capacity > 0 && req.attendees_count > space.capacity {
        return Err(CampusError::Validation(format!(
            "Exceeds space capacity ({})",
            space.capacity
        )));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let conflicts = repositories::space::overlapping_active(
        &mut tx,
        space.id,
        req.start_time,
        req.end_time,
        None,
    )
    .await
    .map_err(CampusError::Database)?;

    if !conflicts.is_empty() {
        return Ok(BookingCreation::Conflicted(conflicts));
    }

    let booking = repositories::space::insert_booking(
        &mut tx,
        space.id,
        actor.id,
        req.start_time,
        req.end_time,
        &req.purpose,
        req.attendees_count,
    )
    .await
    .map_err(CampusError::Database)?;

    repositories::space::insert_booking_log(
        &mut tx,
        booking.id,
        "",
        &BookingStatus::Pending.to_string(),
        actor.id,
        "Booking created",
    )
    .await
    .map_err(CampusError::Database)?;

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    Ok(BookingCreation::Created(booking))
}

async fn apply_transition(
    pool: &Pool<Postgres>,
    booking: &DbSpaceBooking,
    to: BookingStatus,
    actor: &Principal,
    comment: Option<&str>,
    reviewed_by: Option<Uuid>,
    rejection_reason: Option<&str>,
) -> CampusResult<Outcome<DbSpaceBooking>> {
    let current = parse_status(&booking.status)?;

    let resolved =
        match booking_workflow().check(current, to, actor, Some(booking.booked_by), comment) {
            Ok(resolved) => resolved,
            Err(denial) => return Ok(Outcome::Denied(denial)),
        };

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    // Approval-time re-check: the slot must still be free of approved
    // bookings. First-approved wins; the loser gets an explicit conflict
    // count to act on.
    if to == BookingStatus::Approved {
        let conflicts = repositories::space::overlapping_approved(
            &mut tx,
            booking.space_id,
            booking.start_time,
            booking.end_time,
            Some(booking.id),
        )
        .await
        .map_err(CampusError::Database)?;

        if !conflicts.is_empty() {
            return Ok(Outcome::denied(format!(
                "Time slot now conflicts with {} approved booking(s)",
                conflicts.len()
            )));
        }
    }

    let updated = repositories::space::transition_booking(
        &mut tx,
        booking.id,
        &resolved.from.to_string(),
        &resolved.to.to_string(),
        reviewed_by,
        rejection_reason,
    )
    .await
    .map_err(CampusError::Database)?;

    let Some(updated) = updated else {
        return Ok(Outcome::denied("Booking was modified concurrently"));
    };

    repositories::space::insert_booking_log(
        &mut tx,
        booking.id,
        &resolved.from.to_string(),
        &resolved.to.to_string(),
        actor.id,
        &resolved.comment,
    )
    .await
    .map_err(CampusError::Database)?;

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    Ok(Outcome::Applied(updated))
}

pub async fn approve(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    actor: &Principal,
    comment: Option<&str>,
) -> CampusResult<Outcome<DbSpaceBooking>> {
    let booking = load_booking(pool, booking_id).await?;
    apply_transition(
        pool,
        &booking,
        BookingStatus::Approved,
        actor,
        comment,
        Some(actor.id),
        None,
    )
    .await
}

pub async fn reject(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    actor: &Principal,
    comment: Option<&str>,
) -> CampusResult<Outcome<DbSpaceBooking>> {
    let booking = load_booking(pool, booking_id).await?;
    let reason = comment.map(str::trim).filter(|c| !c.is_empty());
    apply_transition(
        pool,
        &booking,
        BookingStatus::Rejected,
        actor,
        comment,
        Some(actor.id),
        reason,
    )
    .await
}

/// Cancel a pending or approved booking while its start time is still in
/// the future.
pub async fn cancel(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
    actor: &Principal,
    comment: Option<&str>,
) -> CampusResult<Outcome<DbSpaceBooking>> {
    let booking = load_booking(pool, booking_id).await?;

    if booking.start_time <= Utc::now() {
        return Ok(Outcome::denied("Booking has already started"));
    }

    apply_transition(
        pool,
        &booking,
        BookingStatus::Cancelled,
        actor,
        comment,
        None,
        None,
    )
    .await
}

/// Is the span free, and which bookings block it if not.
pub async fn availability(
    pool: &Pool<Postgres>,
    space_id: Uuid,
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
) -> CampusResult<Vec<DbSpaceBooking>> {
    load_space(pool, space_id).await?;

    if end_time <= start_time {
        return Err(CampusError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let conflicts =
        repositories::space::overlapping_active(&mut conn, space_id, start_time, end_time, None)
            .await
            .map_err(CampusError::Database)?;

    Ok(conflicts)
}

/// The approved schedule of a space for the week starting at `week_start`.
pub async fn week_schedule(
    pool: &Pool<Postgres>,
    space_id: Uuid,
    week_start: NaiveDate,
) -> CampusResult<Vec<DbSpaceBooking>> {
    load_space(pool, space_id).await?;

    let midnight = NaiveTime::MIN;
    let from = week_start.and_time(midnight).and_utc();
    let to = (week_start + chrono::Duration::days(7))
        .and_time(midnight)
        .and_utc();

    let bookings = repositories::space::approved_between(pool, space_id, from, to)
        .await
        .map_err(CampusError::Database)?;

    Ok(bookings)
}

/// Suggest up to `max_suggestions` free slots of the given duration inside
/// the working-hours window of `date`.
pub async fn suggest_slots(
    pool: &Pool<Postgres>,
    space_id: Uuid,
    date: NaiveDate,
    duration_hours: u32,
    max_suggestions: Option<usize>,
) -> CampusResult<Vec<Interval>> {
    load_space(pool, space_id).await?;

    if duration_hours < 1 {
        return Err(CampusError::Validation(
            "Duration must be at least one hour".to_string(),
        ));
    }

    let midnight = NaiveTime::MIN;
    let day_start = date.and_time(midnight).and_utc();
    let day_end = (date + chrono::Duration::days(1)).and_time(midnight).and_utc();

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let occupied =
        repositories::space::overlapping_active(&mut conn, space_id, day_start, day_end, None)
            .await
            .map_err(CampusError::Database)?
            .into_iter()
            .map(|b| Interval::new(b.start_time, b.end_time))
            .collect::<Vec<_>>();

    let suggestions = conflict::suggest_slots(
        date,
        chrono::Duration::hours(i64::from(duration_hours)),
        &occupied,
        max_suggestions.unwrap_or(DEFAULT_MAX_SUGGESTIONS),
    );

    Ok(suggestions)
}
