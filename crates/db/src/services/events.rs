//! Event approval workflow: submit, approve, reject. Every transition is
//! checked against the event transition table, then written as a
//! compare-and-swap status update plus an audit-log append in one
//! transaction.

use campus_core::errors::{CampusError, CampusResult};
use campus_core::models::event::{CreateEventRequest, EventStatus};
use campus_core::models::notification::NotificationType;
use campus_core::models::principal::Principal;
use campus_core::workflow::{event_workflow, Outcome};
use eyre::eyre;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbEvent;
use crate::repositories;
use crate::services::notify;

fn parse_status(raw: &str) -> CampusResult<EventStatus> {
    raw.parse::<EventStatus>()
        .map_err(|_| CampusError::Database(eyre!("Unknown event status: {}", raw)))
}

async fn load_event(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbEvent> {
    repositories::event::get_event_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Event with ID {} not found", id)))
}

pub async fn create_event(
    pool: &Pool<Postgres>,
    actor: &Principal,
    req: &CreateEventRequest,
) -> CampusResult<DbEvent> {
    if req.title.trim().is_empty() {
        return Err(CampusError::Validation("Title is required".to_string()));
    }
    if req.end_at <= req.start_at {
        return Err(CampusError::Validation(
            "End must be after start".to_string(),
        ));
    }
    if req.awards_xp < 0 {
        return Err(CampusError::Validation(
            "Awarded XP cannot be negative".to_string(),
        ));
    }

    let event = repositories::event::create_event(
        pool,
        req.title.trim(),
        &req.description,
        req.start_at,
        req.end_at,
        &req.location,
        req.awards_xp,
        actor.id,
    )
    .await
    .map_err(CampusError::Database)?;

    Ok(event)
}

/// Execute a checked transition: compare-and-swap the status, append the
/// audit-log row, commit. A CAS miss means a concurrent writer moved the
/// item first and surfaces as a denial.
async fn apply_transition(
    pool: &Pool<Postgres>,
    event: &DbEvent,
    to: EventStatus,
    actor: &Principal,
    comment: Option<&str>,
    rejection_comment: Option<&str>,
) -> CampusResult<Outcome<DbEvent>> {
    let current = parse_status(&event.status)?;

    let resolved = match event_workflow().check(current, to, actor, Some(event.created_by), comment)
    {
        Ok(resolved) => resolved,
        Err(denial) => return Ok(Outcome::Denied(denial)),
    };

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let updated = repositories::event::transition_status(
        &mut tx,
        event.id,
        &resolved.from.to_string(),
        &resolved.to.to_string(),
        rejection_comment,
    )
    .await
    .map_err(CampusError::Database)?;

    let Some(updated) = updated else {
        return Ok(Outcome::denied("Event was modified concurrently"));
    };

    repositories::event::insert_approval_log(
        &mut tx,
        event.id,
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

/// Creator submits a draft event for approval.
pub async fn submit(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    actor: &Principal,
) -> CampusResult<Outcome<DbEvent>> {
    let event = load_event(pool, event_id).await?;
    apply_transition(pool, &event, EventStatus::Pending, actor, None, None).await
}

/// Moderator approves a pending event. Clears any stale rejection comment
/// and notifies the creator.
pub async fn approve(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    actor: &Principal,
    comment: Option<&str>,
) -> CampusResult<Outcome<DbEvent>> {
    let event = load_event(pool, event_id).await?;
    let outcome =
        apply_transition(pool, &event, EventStatus::Approved, actor, comment, Some("")).await?;

    if let Outcome::Applied(approved) = &outcome {
        notify::emit(
            pool,
            approved.created_by,
            NotificationType::EventApproved,
            "Event approved",
            &format!("\"{}\" was approved", approved.title),
            Some(approved.id),
        )
        .await;
    }

    Ok(outcome)
}

/// Moderator rejects a pending event. The reason is mandatory; a blank one
/// is denied before anything is written.
pub async fn reject(
    pool: &Pool<Postgres>,
    event_id: Uuid,
    actor: &Principal,
    comment: Option<&str>,
) -> CampusResult<Outcome<DbEvent>> {
    let event = load_event(pool, event_id).await?;
    let reason = comment.map(str::trim).filter(|c| !c.is_empty());
    let outcome =
        apply_transition(pool, &event, EventStatus::Rejected, actor, comment, reason).await?;

    if let Outcome::Applied(rejected) = &outcome {
        notify::emit(
            pool,
            rejected.created_by,
            NotificationType::EventRejected,
            "Event rejected",
            &format!("\"{}\" was rejected: {}", rejected.title, rejected.rejection_comment),
            Some(rejected.id),
        )
        .await;
    }

    Ok(outcome)
}
