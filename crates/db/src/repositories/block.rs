use crate::models::DbScheduleBlock;
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};

const COLUMNS: &str = "id, date, is_full_day, start_time, end_time, reason, created_at";

pub async fn create_full_day_block(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    reason: Option<&str>,
) -> Result<DbScheduleBlock> {
    tracing::debug!("Creating full-day block: date={}", date);

    let block = sqlx::query_as::<_, DbScheduleBlock>(&format!(
        r#"
        INSERT INTO schedule_blocks (date, is_full_day, reason)
        VALUES ($1, TRUE, $2)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(date)
    .bind(reason)
    .fetch_one(pool)
    .await?;

    Ok(block)
}

/// Inserts a partial block unless the date is already closed for the whole
/// day. Returns `None` when a full-day block got there first.
pub async fn create_partial_block(
    pool: &Pool<Postgres>,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    reason: Option<&str>,
) -> Result<Option<DbScheduleBlock>> {
    tracing::debug!("Creating partial block: date={}, {}-{}", date, start_time, end_time);

    let block = sqlx::query_as::<_, DbScheduleBlock>(&format!(
        r#"
        INSERT INTO schedule_blocks (date, is_full_day, start_time, end_time, reason)
        SELECT $1, FALSE, $2, $3, $4
        WHERE NOT EXISTS (
            SELECT 1 FROM schedule_blocks WHERE date = $1 AND is_full_day
        )
        RETURNING {COLUMNS}
        "#
    ))
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .bind(reason)
    .fetch_optional(pool)
    .await?;

    Ok(block)
}

pub async fn get_blocks_by_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Vec<DbScheduleBlock>> {
    let blocks = sqlx::query_as::<_, DbScheduleBlock>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM schedule_blocks
        WHERE date = $1
        ORDER BY start_time ASC NULLS FIRST, id ASC
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(blocks)
}

pub async fn list_blocks(
    pool: &Pool<Postgres>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<DbScheduleBlock>> {
    let blocks = sqlx::query_as::<_, DbScheduleBlock>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM schedule_blocks
        WHERE ($1::DATE IS NULL OR date >= $1)
          AND ($2::DATE IS NULL OR date <= $2)
        ORDER BY date ASC, start_time ASC NULLS FIRST, id ASC
        "#
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(blocks)
}

pub async fn delete_block(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM schedule_blocks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
