use crate::models::DbUser;
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    display_name: &str,
    role: &str,
) -> Result<DbUser> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, email, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, display_name, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, display_name, role, lifetime_points, season_points, created_at
        "#,
    )
    .bind(id)
    .bind(email)
    .bind(display_name)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, display_name, role, lifetime_points, season_points, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Bump both cached balances by a signed delta. Only the ledger post path
/// may call this; everything else goes through recalculation.
pub async fn adjust_cached_points(
    conn: &mut PgConnection,
    user_id: Uuid,
    delta: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET lifetime_points = lifetime_points + $2,
            season_points = season_points + $2
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(delta)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn set_cached_points(
    conn: &mut PgConnection,
    user_id: Uuid,
    lifetime: i64,
    season: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET lifetime_points = $2, season_points = $3
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(lifetime)
    .bind(season)
    .execute(conn)
    .await?;

    Ok(())
}
