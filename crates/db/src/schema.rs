use eyre::Result;
use sqlx::{Executor, Pool, Postgres};
use tracing::info;

/// Constraint names the store inspects to tell admission failures apart.
pub const APPOINTMENTS_NO_OVERLAP: &str = "appointments_no_overlap";
pub const BLOCKS_NO_OVERLAP: &str = "schedule_blocks_no_overlap";
pub const BLOCKS_ONE_FULL_DAY: &str = "schedule_blocks_one_full_day";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create customers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            phone VARCHAR(50) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            price BIGINT NOT NULL CHECK (price >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            username VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(20) NOT NULL CHECK (role IN ('admin', 'barber')),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table; active rows may never overlap
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id BIGSERIAL PRIMARY KEY,
            customer_id BIGINT NOT NULL REFERENCES customers(id),
            service_id BIGINT NOT NULL REFERENCES services(id),
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'confirmed', 'cancelled', 'completed', 'in_progress')),
            notified BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT appointments_valid_range CHECK (end_time > start_time),
            CONSTRAINT appointments_no_overlap EXCLUDE USING gist (
                tsrange(date + start_time, date + end_time, '[)') WITH &&
            ) WHERE (status <> 'cancelled')
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_blocks table; partial blocks on a date may not overlap
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_blocks (
            id BIGSERIAL PRIMARY KEY,
            date DATE NOT NULL,
            is_full_day BOOLEAN NOT NULL DEFAULT FALSE,
            start_time TIME NULL,
            end_time TIME NULL,
            reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT schedule_blocks_partial_range CHECK (
                is_full_day
                OR (start_time IS NOT NULL AND end_time IS NOT NULL AND end_time > start_time)
            ),
            CONSTRAINT schedule_blocks_no_overlap EXCLUDE USING gist (
                tsrange(date + start_time, date + end_time, '[)') WITH &&
            ) WHERE (NOT is_full_day)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; several statements, so this goes through the simple query protocol
    pool.execute(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS schedule_blocks_one_full_day
            ON schedule_blocks(date) WHERE is_full_day;
        CREATE INDEX IF NOT EXISTS idx_schedule_blocks_date ON schedule_blocks(date);
        CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date, start_time);
        CREATE INDEX IF NOT EXISTS idx_appointments_customer_id ON appointments(customer_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_notified
            ON appointments(notified) WHERE NOT notified;
        "#,
    )
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
