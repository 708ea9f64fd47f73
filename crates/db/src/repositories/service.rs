use crate::models::DbService;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_service(
    pool: &Pool<Postgres>,
    name: &str,
    duration_minutes: i32,
    price: i64,
) -> Result<DbService> {
    tracing::debug!("Creating service: name={}, duration={}min", name, duration_minutes);

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (name, duration_minutes, price)
        VALUES ($1, $2, $3)
        RETURNING id, name, duration_minutes, price
        "#,
    )
    .bind(name)
    .bind(duration_minutes)
    .bind(price)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        "SELECT id, name, duration_minutes, price FROM services WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

/// Case-insensitive lookup, as clients type service names by hand.
pub async fn get_service_by_name(pool: &Pool<Postgres>, name: &str) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        "SELECT id, name, duration_minutes, price FROM services WHERE LOWER(name) = LOWER($1)",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn list_services(pool: &Pool<Postgres>, skip: i64, limit: i64) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, duration_minutes, price
        FROM services
        ORDER BY id ASC
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(skip.max(0))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn update_service(
    pool: &Pool<Postgres>,
    id: i64,
    name: Option<&str>,
    duration_minutes: Option<i32>,
    price: Option<i64>,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = COALESCE($2, name),
            duration_minutes = COALESCE($3, duration_minutes),
            price = COALESCE($4, price)
        WHERE id = $1
        RETURNING id, name, duration_minutes, price
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(duration_minutes)
    .bind(price)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn delete_service(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM services WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
