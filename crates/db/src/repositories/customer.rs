use crate::models::DbCustomer;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn create_customer(pool: &Pool<Postgres>, name: &str, phone: &str) -> Result<DbCustomer> {
    tracing::debug!("Creating customer: name={}, phone={}", name, phone);

    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        INSERT INTO customers (name, phone)
        VALUES ($1, $2)
        RETURNING id, name, phone, created_at
        "#,
    )
    .bind(name)
    .bind(phone)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

pub async fn get_customer_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, phone, created_at
        FROM customers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn get_customer_by_phone(
    pool: &Pool<Postgres>,
    phone: &str,
) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, phone, created_at
        FROM customers
        WHERE phone = $1
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn list_customers(
    pool: &Pool<Postgres>,
    skip: i64,
    limit: i64,
) -> Result<Vec<DbCustomer>> {
    let customers = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, phone, created_at
        FROM customers
        ORDER BY id ASC
        OFFSET $1
        LIMIT $2
        "#,
    )
    .bind(skip.max(0))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(customers)
}

pub async fn update_customer(
    pool: &Pool<Postgres>,
    id: i64,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        UPDATE customers
        SET name = COALESCE($2, name), phone = COALESCE($3, phone)
        WHERE id = $1
        RETURNING id, name, phone, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

pub async fn delete_customer(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
