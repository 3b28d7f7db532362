use crate::models::{DbBookingApprovalLog, DbSpace, DbSpaceBooking};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn create_space(
    pool: &Pool<Postgres>,
    name: &str,
    space_type: &str,
    capacity: i32,
    location: &str,
) -> Result<DbSpace> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating space: id={}, name={}", id, name);

    let space = sqlx::query_as::<_, DbSpace>(
        r#"
        INSERT INTO spaces (id, name, space_type, capacity, location)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, space_type, capacity, location, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(space_type)
    .bind(capacity)
    .bind(location)
    .fetch_one(pool)
    .await?;

    Ok(space)
}

pub async fn get_space_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSpace>> {
    let space = sqlx::query_as::<_, DbSpace>(
        r#"
        SELECT id, name, space_type, capacity, location, is_active, created_at
        FROM spaces
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(space)
}

pub async fn list_spaces(pool: &Pool<Postgres>) -> Result<Vec<DbSpace>> {
    let spaces = sqlx::query_as::<_, DbSpace>(
        r#"
        SELECT id, name, space_type, capacity, location, is_active, created_at
        FROM spaces
        WHERE is_active
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(spaces)
}

pub async fn insert_booking(
    conn: &mut PgConnection,
    space_id: Uuid,
    booked_by: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    purpose: &str,
    attendees_count: i32,
) -> Result<DbSpaceBooking> {
    let id = Uuid::new_v4();

    tracing::debug!(
        "Creating booking: id={}, space={}, {} - {}",
        id,
        space_id,
        start_time,
        end_time
    );

    let booking = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        INSERT INTO space_bookings (id, space_id, booked_by, start_time, end_time, purpose, attendees_count)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
                  status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(space_id)
    .bind(booked_by)
    .bind(start_time)
    .bind(end_time)
    .bind(purpose)
    .bind(attendees_count)
    .fetch_one(conn)
    .await?;

    Ok(booking)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSpaceBooking>> {
    let booking = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        SELECT id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
               status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        FROM space_bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Bookings occupying the timeline (pending or approved) that overlap
/// `[start_time, end_time)` for the space, half-open semantics.
pub async fn overlapping_active(
    conn: &mut PgConnection,
    space_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_booking_id: Option<Uuid>,
) -> Result<Vec<DbSpaceBooking>> {
    let conflicts = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        SELECT id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
               status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        FROM space_bookings
        WHERE space_id = $1
          AND status IN ('pending', 'approved')
          AND start_time < $3
          AND end_time > $2
          AND ($4::uuid IS NULL OR id <> $4)
        ORDER BY start_time ASC
        "#,
    )
    .bind(space_id)
    .bind(start_time)
    .bind(end_time)
    .bind(exclude_booking_id)
    .fetch_all(conn)
    .await?;

    Ok(conflicts)
}

/// Approved bookings overlapping `[start_time, end_time)` — the
/// approval-time re-check set.
pub async fn overlapping_approved(
    conn: &mut PgConnection,
    space_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude_booking_id: Option<Uuid>,
) -> Result<Vec<DbSpaceBooking>> {
    let conflicts = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        SELECT id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
               status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        FROM space_bookings
        WHERE space_id = $1
          AND status = 'approved'
          AND start_time < $3
          AND end_time > $2
          AND ($4::uuid IS NULL OR id <> $4)
        ORDER BY start_time ASC
        "#,
    )
    .bind(space_id)
    .bind(start_time)
    .bind(end_time)
    .bind(exclude_booking_id)
    .fetch_all(conn)
    .await?;

    Ok(conflicts)
}

/// Approved bookings for a space inside `[from, to)`, chronological.
pub async fn approved_between(
    pool: &Pool<Postgres>,
    space_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbSpaceBooking>> {
    let bookings = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        SELECT id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
               status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        FROM space_bookings
        WHERE space_id = $1
          AND status = 'approved'
          AND start_time < $3
          AND end_time > $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(space_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Compare-and-swap status update; None when the expected status no longer
/// holds. Reviewer fields are stamped when a reviewer is given.
pub async fn transition_booking(
    conn: &mut PgConnection,
    id: Uuid,
    expected: &str,
    to: &str,
    reviewed_by: Option<Uuid>,
    rejection_reason: Option<&str>,
) -> Result<Option<DbSpaceBooking>> {
    let booking = sqlx::query_as::<_, DbSpaceBooking>(
        r#"
        UPDATE space_bookings
        SET status = $3,
            reviewed_by = COALESCE($4, reviewed_by),
            reviewed_at = CASE WHEN $4::uuid IS NULL THEN reviewed_at ELSE NOW() END,
            rejection_reason = COALESCE($5, rejection_reason),
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, space_id, booked_by, start_time, end_time, purpose, attendees_count,
                  status, reviewed_by, reviewed_at, rejection_reason, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(to)
    .bind(reviewed_by)
    .bind(rejection_reason)
    .fetch_optional(conn)
    .await?;

    Ok(booking)
}

pub async fn insert_booking_log(
    conn: &mut PgConnection,
    booking_id: Uuid,
    from_status: &str,
    to_status: &str,
    changed_by: Uuid,
    comment: &str,
) -> Result<DbBookingApprovalLog> {
    let id = Uuid::new_v4();

    let log = sqlx::query_as::<_, DbBookingApprovalLog>(
        r#"
        INSERT INTO booking_approval_logs (id, booking_id, from_status, to_status, changed_by, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, booking_id, from_status, to_status, changed_by, comment, created_at
        "#,
    )
    .bind(id)
    .bind(booking_id)
    .bind(from_status)
    .bind(to_status)
    .bind(changed_by)
    .bind(comment)
    .fetch_one(conn)
    .await?;

    Ok(log)
}

pub async fn booking_logs(
    pool: &Pool<Postgres>,
    booking_id: Uuid,
) -> Result<Vec<DbBookingApprovalLog>> {
    let logs = sqlx::query_as::<_, DbBookingApprovalLog>(
        r#"
        SELECT id, booking_id, from_status, to_status, changed_by, comment, created_at
        FROM booking_approval_logs
        WHERE booking_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(booking_id)
    .fetch_all(pool)
    .await?;

    Ok(logs)
}
