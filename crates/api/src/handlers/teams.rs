use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use campus_core::{
    errors::CampusError,
    models::team::{
        ApplyToTeamRequest, CreateTeamRequest, InviteToTeamRequest, TeamMemberResponse,
        TeamRequestResponse, TeamResponse,
    },
};
use campus_db::models::{DbTeam, DbTeamRequest};
use campus_db::services::teams;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{error_handling::AppError, identity::Identity},
    ApiState,
};

fn request_response(request: DbTeamRequest) -> TeamRequestResponse {
    TeamRequestResponse {
        id: request.id,
        team_id: request.team_id,
        user_id: request.user_id,
        message: request.message,
        status: request.status,
        invited_by: request.invited_by,
        created_at: request.created_at,
    }
}

async fn team_with_members(
    state: &ApiState,
    team: DbTeam,
) -> Result<TeamResponse, AppError> {
    let members = campus_db::repositories::team::members_of(&state.db_pool, team.id)
        .await
        .map_err(CampusError::Database)?;

    Ok(TeamResponse {
        id: team.id,
        name: team.name,
        description: team.description,
        created_by: team.created_by,
        is_open: team.is_open,
        members: members
            .into_iter()
            .map(|m| TeamMemberResponse {
                user_id: m.user_id,
                is_leader: m.is_leader,
            })
            .collect(),
    })
}

/// Create a team; the caller becomes its first leader.
#[axum::debug_handler]
pub async fn create_team(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    let team =
        teams::create_team(&state.db_pool, &actor, &payload.name, &payload.description).await?;

    Ok(Json(team_with_members(&state, team).await?))
}

#[axum::debug_handler]
pub async fn get_team(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, AppError> {
    let team = campus_db::repositories::team::get_team_by_id(&state.db_pool, id)
        .await
        .map_err(CampusError::Database)?
        .ok_or_else(|| CampusError::NotFound(format!("Team with ID {} not found", id)))?;

    Ok(Json(team_with_members(&state, team).await?))
}

/// Apply to join a team. A pending or accepted request blocks
/// re-application; a rejected one resets to pending.
#[axum::debug_handler]
pub async fn apply_to_team(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyToTeamRequest>,
) -> Result<Json<TeamRequestResponse>, AppError> {
    let request = teams::apply(&state.db_pool, id, &actor, &payload.message)
        .await?
        .into_result()?;

    Ok(Json(request_response(request)))
}

/// Invite a user to the team (managers only).
#[axum::debug_handler]
pub async fn invite_to_team(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<InviteToTeamRequest>,
) -> Result<Json<TeamRequestResponse>, AppError> {
    let request = teams::invite(&state.db_pool, id, &actor, payload.user_id, &payload.message)
        .await?
        .into_result()?;

    Ok(Json(request_response(request)))
}

/// Accept a pending request; enrolls the requester as a member.
#[axum::debug_handler]
pub async fn accept_request(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamMemberResponse>, AppError> {
    let member = teams::accept(&state.db_pool, id, &actor)
        .await?
        .into_result()?;

    Ok(Json(TeamMemberResponse {
        user_id: member.user_id,
        is_leader: member.is_leader,
    }))
}

#[axum::debug_handler]
pub async fn reject_request(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamRequestResponse>, AppError> {
    let request = teams::reject(&state.db_pool, id, &actor)
        .await?
        .into_result()?;

    Ok(Json(request_response(request)))
}

/// Leave a team. The last remaining leader is refused until leadership is
/// transferred.
#[axum::debug_handler]
pub async fn leave_team(
    State(state): State<Arc<ApiState>>,
    Identity(actor): Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    teams::leave(&state.db_pool, id, &actor).await?.into_result()?;

    Ok(StatusCode::NO_CONTENT)
}
