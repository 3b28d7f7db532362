use crate::models::{DbTeam, DbTeamMember, DbTeamRequest};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn insert_team(
    conn: &mut PgConnection,
    name: &str,
    description: &str,
    created_by: Uuid,
) -> Result<DbTeam> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating team: id={}, name={}", id, name);

    let team = sqlx::query_as::<_, DbTeam>(
        r#"
        INSERT INTO teams (id, name, description, created_by)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, description, created_by, is_open, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(created_by)
    .fetch_one(conn)
    .await?;

    Ok(team)
}

pub async fn get_team_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTeam>> {
    let team = sqlx::query_as::<_, DbTeam>(
        r#"
        SELECT id, name, description, created_by, is_open, created_at, updated_at
        FROM teams
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(team)
}

/// Insert a membership; None when the user is already a member (the
/// (team, user) uniqueness constraint absorbs accept races).
pub async fn insert_member(
    conn: &mut PgConnection,
    team_id: Uuid,
    user_id: Uuid,
    is_leader: bool,
) -> Result<Option<DbTeamMember>> {
    let id = Uuid::new_v4();

    let member = sqlx::query_as::<_, DbTeamMember>(
        r#"
        INSERT INTO team_members (id, team_id, user_id, is_leader)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (team_id, user_id) DO NOTHING
        RETURNING id, team_id, user_id, is_leader, created_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .bind(user_id)
    .bind(is_leader)
    .fetch_optional(conn)
    .await?;

    Ok(member)
}

pub async fn get_member(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DbTeamMember>> {
    let member = sqlx::query_as::<_, DbTeamMember>(
        r#"
        SELECT id, team_id, user_id, is_leader, created_at
        FROM team_members
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(member)
}

pub async fn members_of(pool: &Pool<Postgres>, team_id: Uuid) -> Result<Vec<DbTeamMember>> {
    let members = sqlx::query_as::<_, DbTeamMember>(
        r#"
        SELECT id, team_id, user_id, is_leader, created_at
        FROM team_members
        WHERE team_id = $1
        ORDER BY is_leader DESC, created_at ASC
        "#,
    )
    .bind(team_id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn leader_count(pool: &Pool<Postgres>, team_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM team_members
        WHERE team_id = $1 AND is_leader
        "#,
    )
    .bind(team_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn delete_member(pool: &Pool<Postgres>, team_id: Uuid, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM team_members
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn get_request(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DbTeamRequest>> {
    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        SELECT id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
               created_at, updated_at
        FROM team_requests
        WHERE team_id = $1 AND user_id = $2
        "#,
    )
    .bind(team_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

pub async fn get_request_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTeamRequest>> {
    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        SELECT id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
               created_at, updated_at
        FROM team_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(request)
}

pub async fn insert_request(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    user_id: Uuid,
    message: &str,
) -> Result<DbTeamRequest> {
    let id = Uuid::new_v4();

    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        INSERT INTO team_requests (id, team_id, user_id, message)
        VALUES ($1, $2, $3, $4)
        RETURNING id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .bind(user_id)
    .bind(message)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

/// Re-open a previously rejected request as a fresh application, discarding
/// the old inviter and reviewer fields.
pub async fn reset_request(pool: &Pool<Postgres>, id: Uuid, message: &str) -> Result<DbTeamRequest> {
    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        UPDATE team_requests
        SET status = 'pending',
            message = $2,
            invited_by = NULL,
            reviewed_by = NULL,
            reviewed_at = NULL,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(message)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

/// Invitation upsert: creates or overwrites the (team, user) request as a
/// pending invite from the given inviter.
pub async fn upsert_invite(
    pool: &Pool<Postgres>,
    team_id: Uuid,
    user_id: Uuid,
    message: &str,
    invited_by: Uuid,
) -> Result<DbTeamRequest> {
    let id = Uuid::new_v4();

    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        INSERT INTO team_requests (id, team_id, user_id, message, status, invited_by)
        VALUES ($1, $2, $3, $4, 'pending', $5)
        ON CONFLICT (team_id, user_id)
        DO UPDATE SET status = 'pending',
                      message = EXCLUDED.message,
                      invited_by = EXCLUDED.invited_by,
                      reviewed_by = NULL,
                      reviewed_at = NULL,
                      updated_at = NOW()
        RETURNING id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(team_id)
    .bind(user_id)
    .bind(message)
    .bind(invited_by)
    .fetch_one(pool)
    .await?;

    Ok(request)
}

/// Compare-and-swap on the request status; None when a concurrent reviewer
/// resolved it first.
pub async fn transition_request(
    conn: &mut PgConnection,
    id: Uuid,
    expected: &str,
    to: &str,
    reviewed_by: Uuid,
) -> Result<Option<DbTeamRequest>> {
    let request = sqlx::query_as::<_, DbTeamRequest>(
        r#"
        UPDATE team_requests
        SET status = $3,
            reviewed_by = $4,
            reviewed_at = NOW(),
            updated_at = NOW()
        WHERE id = $1 AND status = $2
        RETURNING id, team_id, user_id, message, status, invited_by, reviewed_by, reviewed_at,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(expected)
    .bind(to)
    .bind(reviewed_by)
    .fetch_optional(conn)
    .await?;

    Ok(request)
}
