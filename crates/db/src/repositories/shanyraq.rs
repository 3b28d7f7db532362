use crate::models::{DbShanyraq, DbShanyraqMembership, DbStudentPoints};
use eyre::Result;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn create_shanyraq(pool: &Pool<Postgres>, name: &str, slug: &str) -> Result<DbShanyraq> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating shanyraq: id={}, slug={}", id, slug);

    let shanyraq = sqlx::query_as::<_, DbShanyraq>(
        r#"
        INSERT INTO shanyraqs (id, name, slug)
        VALUES ($1, $2, $3)
        RETURNING id, name, slug, total_points, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;

    Ok(shanyraq)
}

pub async fn get_shanyraq_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbShanyraq>> {
    let shanyraq = sqlx::query_as::<_, DbShanyraq>(
        r#"
        SELECT id, name, slug, total_points, created_at
        FROM shanyraqs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(shanyraq)
}

pub async fn list_shanyraqs(pool: &Pool<Postgres>) -> Result<Vec<DbShanyraq>> {
    let shanyraqs = sqlx::query_as::<_, DbShanyraq>(
        r#"
        SELECT id, name, slug, total_points, created_at
        FROM shanyraqs
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(shanyraqs)
}

pub async fn list_shanyraq_ids(pool: &Pool<Postgres>) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>("SELECT id FROM shanyraqs")
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

/// Write the cached total. Callers are the recompute path only.
pub async fn set_total_points(conn: &mut PgConnection, id: Uuid, total: i64) -> Result<()> {
    sqlx::query("UPDATE shanyraqs SET total_points = $2 WHERE id = $1")
        .bind(id)
        .bind(total)
        .execute(conn)
        .await?;

    Ok(())
}

/// Enroll a user; re-joining the same group refreshes joined_at so the
/// most-recently-joined rule keeps working.
pub async fn add_member(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    shanyraq_id: Uuid,
    is_leader: bool,
) -> Result<DbShanyraqMembership> {
    let id = Uuid::new_v4();

    let membership = sqlx::query_as::<_, DbShanyraqMembership>(
        r#"
        INSERT INTO shanyraq_memberships (id, user_id, shanyraq_id, is_leader)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, shanyraq_id)
        DO UPDATE SET joined_at = NOW(), is_leader = EXCLUDED.is_leader
        RETURNING id, user_id, shanyraq_id, is_leader, joined_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(shanyraq_id)
    .bind(is_leader)
    .fetch_one(pool)
    .await?;

    Ok(membership)
}

/// The user's current group for points attribution: most recently joined
/// membership wins.
pub async fn current_shanyraq_id(conn: &mut PgConnection, user_id: Uuid) -> Result<Option<Uuid>> {
    let shanyraq_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT shanyraq_id
        FROM shanyraq_memberships
        WHERE user_id = $1
        ORDER BY joined_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;

    Ok(shanyraq_id)
}

pub async fn top_shanyraqs(pool: &Pool<Postgres>, limit: i64) -> Result<Vec<DbShanyraq>> {
    let shanyraqs = sqlx::query_as::<_, DbShanyraq>(
        r#"
        SELECT id, name, slug, total_points, created_at
        FROM shanyraqs
        ORDER BY total_points DESC, name ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(shanyraqs)
}

pub async fn top_students(
    pool: &Pool<Postgres>,
    limit: i64,
    shanyraq_id: Option<Uuid>,
) -> Result<Vec<DbStudentPoints>> {
    let students = sqlx::query_as::<_, DbStudentPoints>(
        r#"
        SELECT u.id AS user_id, u.display_name, u.season_points AS points
        FROM users u
        WHERE $2::uuid IS NULL OR EXISTS (
            SELECT 1 FROM shanyraq_memberships m
            WHERE m.user_id = u.id AND m.shanyraq_id = $2
        )
        ORDER BY u.season_points DESC, u.display_name ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .bind(shanyraq_id)
    .fetch_all(pool)
    .await?;

    Ok(students)
}
