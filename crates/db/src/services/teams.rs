//! Team formation workflow: create, apply, invite, accept, reject, leave.

use campus_core::errors::{CampusError, CampusResult};
use campus_core::models::notification::NotificationType;
use campus_core::models::principal::Principal;
use campus_core::models::team::TeamRequestStatus;
use campus_core::workflow::Outcome;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbTeam, DbTeamMember, DbTeamRequest};
use crate::repositories;
use crate::services::notify;

async fn load_team(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbTeam> {
    repositories::team::get_team_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Team with ID {} not found", id)))
}

async fn load_request(pool: &Pool<Postgres>, id: Uuid) -> CampusResult<DbTeamRequest> {
    repositories::team::get_request_by_id(pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Team request with ID {} not found", id)))
}

/// Leaders and the team creator may invite, accept and reject.
async fn can_manage(pool: &Pool<Postgres>, team: &DbTeam, user_id: Uuid) -> CampusResult<bool> {
    if team.created_by == user_id {
        return Ok(true);
    }

    let member = repositories::team::get_member(pool, team.id, user_id)
        .await
        .map_err(CampusError::Database)?;

    Ok(member.is_some_and(|m| m.is_leader))
}

/// Create a team; the creator is enrolled as its first leader in the same
/// transaction.
pub async fn create_team(
    pool: &Pool<Postgres>,
    actor: &Principal,
    name: &str,
    description: &str,
) -> CampusResult<DbTeam> {
    if name.trim().is_empty() {
        return Err(CampusError::Validation("Team name is required".to_string()));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let team = repositories::team::insert_team(&mut tx, name.trim(), description, actor.id)
        .await
        .map_err(CampusError::Database)?;

    repositories::team::insert_member(&mut tx, team.id, actor.id, true)
        .await
        .map_err(CampusError::Database)?;

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    Ok(team)
}

/// Apply to join a team. A still-pending or accepted request blocks
/// re-application; a rejected one is reset to a fresh pending application.
pub async fn apply(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    actor: &Principal,
    message: &str,
) -> CampusResult<Outcome<DbTeamRequest>> {
    let team = load_team(pool, team_id).await?;

    let member = repositories::team::get_member(pool, team.id, actor.id)
        .await
        .map_err(CampusError::Database)?;
    if member.is_some() {
        return Ok(Outcome::denied("Already a member"));
    }

    let existing = repositories::team::get_request(pool, team.id, actor.id)
        .await
        .map_err(CampusError::Database)?;

    let request = match existing {
        None => repositories::team::insert_request(pool, team.id, actor.id, message)
            .await
            .map_err(CampusError::Database)?,
        Some(request) => match request.status.parse::<TeamRequestStatus>() {
            Ok(TeamRequestStatus::Pending) => {
                return Ok(Outcome::denied("Application already pending"));
            }
            Ok(TeamRequestStatus::Accepted) => {
                return Ok(Outcome::denied("Already a member"));
            }
            _ => repositories::team::reset_request(pool, request.id, message)
                .await
                .map_err(CampusError::Database)?,
        },
    };

    Ok(Outcome::Applied(request))
}

/// Invite a user. Only managers may invite; the (team, user) request row is
/// upserted to a pending invitation whatever its prior state.
pub async fn invite(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    actor: &Principal,
    invitee_id: Uuid,
    message: &str,
) -> CampusResult<Outcome<DbTeamRequest>> {
    let team = load_team(pool, team_id).await?;

    repositories::user::get_user_by_id(pool, invitee_id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("User with ID {} not found", invitee_id)))?;

    if !can_manage(pool, &team, actor.id).await? {
        return Ok(Outcome::denied("You cannot invite to this team"));
    }

    let member = repositories::team::get_member(pool, team.id, invitee_id)
        .await
        .map_err(CampusError::Database)?;
    if member.is_some() {
        return Ok(Outcome::denied("User is already a member"));
    }

    let request = repositories::team::upsert_invite(pool, team.id, invitee_id, message, actor.id)
        .await
        .map_err(CampusError::Database)?;

    notify::emit(
        pool,
        invitee_id,
        NotificationType::TeamInvite,
        "Team invitation",
        &format!("You were invited to join \"{}\"", team.name),
        Some(team.id),
    )
    .await;

    Ok(Outcome::Applied(request))
}

/// Accept a pending request. Managers may accept any request; an invited
/// user may accept their own invitation. "Already a member" is a hard
/// failure, which also settles concurrent accepts.
pub async fn accept(
    pool: &Pool<Postgres>,
    request_id: Uuid,
    actor: &Principal,
) -> CampusResult<Outcome<DbTeamMember>> {
    let request = load_request(pool, request_id).await?;

    if request.status != TeamRequestStatus::Pending.to_string() {
        return Ok(Outcome::denied("Request is not pending"));
    }

    let team = load_team(pool, request.team_id).await?;
    let is_self = actor.id == request.user_id;
    if !is_self && !can_manage(pool, &team, actor.id).await? {
        return Ok(Outcome::denied("You cannot manage this request"));
    }

    let member = repositories::team::get_member(pool, team.id, request.user_id)
        .await
        .map_err(CampusError::Database)?;
    if member.is_some() {
        return Ok(Outcome::denied("User is already a member"));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let transitioned = repositories::team::transition_request(
        &mut tx,
        request.id,
        &TeamRequestStatus::Pending.to_string(),
        &TeamRequestStatus::Accepted.to_string(),
        actor.id,
    )
    .await
    .map_err(CampusError::Database)?;

    if transitioned.is_none() {
        return Ok(Outcome::denied("Request is not pending"));
    }

    let member = repositories::team::insert_member(&mut tx, team.id, request.user_id, false)
        .await
        .map_err(CampusError::Database)?;

    let Some(member) = member else {
        // A concurrent accept slipped in between the guard read and the
        // insert; the unique constraint is the arbiter.
        return Ok(Outcome::denied("User is already a member"));
    };

    tx.commit()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    Ok(Outcome::Applied(member))
}

/// Reject a pending request. Managers may reject any request; a user may
/// withdraw their own.
pub async fn reject(
    pool: &Pool<Postgres>,
    request_id: Uuid,
    actor: &Principal,
) -> CampusResult<Outcome<DbTeamRequest>> {
    let request = load_request(pool, request_id).await?;

    if request.status != TeamRequestStatus::Pending.to_string() {
        return Ok(Outcome::denied("Request is not pending"));
    }

    let team = load_team(pool, request.team_id).await?;
    let is_self = actor.id == request.user_id;
    if !is_self && !can_manage(pool, &team, actor.id).await? {
        return Ok(Outcome::denied("You cannot manage this request"));
    }

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| CampusError::Database(e.into()))?;

    let transitioned = repositories::team::transition_request(
        &mut conn,
        request.id,
        &TeamRequestStatus::Pending.to_string(),
        &TeamRequestStatus::Rejected.to_string(),
        actor.id,
    )
    .await
    .map_err(CampusError::Database)?;

    match transitioned {
        Some(rejected) => Ok(Outcome::Applied(rejected)),
        None => Ok(Outcome::denied("Request is not pending")),
    }
}

/// Leave a team. The last remaining leader must transfer leadership first.
pub async fn leave(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    actor: &Principal,
) -> CampusResult<Outcome<()>> {
    let team = load_team(pool, team_id).await?;

    let member = repositories::team::get_member(pool, team.id, actor.id)
        .await
        .map_err(CampusError::Database)?;

    let Some(member) = member else {
        return Ok(Outcome::denied("Not a member"));
    };

    if member.is_leader {
        let leaders = repositories::team::leader_count(pool, team.id)
            .await
            .map_err(CampusError::Database)?;
        if leaders <= 1 {
            return Ok(Outcome::denied("Transfer leadership before leaving"));
        }
    }

    let removed = repositories::team::delete_member(pool, team.id, actor.id)
        .await
        .map_err(CampusError::Database)?;

    if removed == 0 {
        return Ok(Outcome::denied("Not a member"));
    }

    Ok(Outcome::Applied(()))
}
