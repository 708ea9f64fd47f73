use crate::models::DbStaffUser;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_staff_user(
    pool: &Pool<Postgres>,
    name: &str,
    username: &str,
    password_hash: &str,
    role: &str,
) -> Result<DbStaffUser> {
    tracing::debug!("Creating staff user: username={}, role={}", username, role);

    let user = sqlx::query_as::<_, DbStaffUser>(
        r#"
        INSERT INTO staff_users (name, username, password_hash, role)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, username, password_hash, role, created_at
        "#,
    )
    .bind(name)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_staff_user_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbStaffUser>> {
    let user = sqlx::query_as::<_, DbStaffUser>(
        r#"
        SELECT id, name, username, password_hash, role, created_at
        FROM staff_users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_staff_user_by_username(
    pool: &Pool<Postgres>,
    username: &str,
) -> Result<Option<DbStaffUser>> {
    let user = sqlx::query_as::<_, DbStaffUser>(
        r#"
        SELECT id, name, username, password_hash, role, created_at
        FROM staff_users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn list_staff_users(
    pool: &Pool<Postgres>,
    skip: i64,
    limit: i64,
) -> Result<Vec<DbStaffUser>> {
    let users = sqlx::query_as::<_, DbStaffUser>(
        r#"
        SELECT id, name, username, password_hash, role, created_at
        FROM staff_users
        ORDER BY id ASC
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(skip.max(0))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn update_staff_user(
    pool: &Pool<Postgres>,
    id: i64,
    name: Option<&str>,
    username: Option<&str>,
    role: Option<&str>,
) -> Result<Option<DbStaffUser>> {
    let user = sqlx::query_as::<_, DbStaffUser>(
        r#"
        UPDATE staff_users
        SET name = COALESCE($2, name),
            username = COALESCE($3, username),
            role = COALESCE($4, role)
        WHERE id = $1
        RETURNING id, name, username, password_hash, role, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(username)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn delete_staff_user(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM staff_users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
