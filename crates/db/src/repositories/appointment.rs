use crate::models::DbAppointment;
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use sqlx::{Pool, Postgres};
use turnero_core::models::appointment::{Appointment, AppointmentQuery};

const COLUMNS: &str =
    "id, customer_id, service_id, date, start_time, end_time, status, notified, created_at";

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    customer_id: i64,
    service_id: i64,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbAppointment> {
    tracing::debug!(
        "Creating appointment: customer_id={}, service_id={}, date={}, {}-{}",
        customer_id, service_id, date, start_time, end_time
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (customer_id, service_id, date, start_time, end_time)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(customer_id)
    .bind(service_id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Appointment created successfully: id={}", appointment.id);
    Ok(appointment)
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Appointments still holding their time on `date`.
pub async fn get_active_appointments_by_date(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE date = $1 AND status <> 'cancelled'
        ORDER BY start_time ASC, id ASC
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn get_appointments_by_customer(
    pool: &Pool<Postgres>,
    customer_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE customer_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(customer_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn list_appointments(
    pool: &Pool<Postgres>,
    query: &AppointmentQuery,
) -> Result<Vec<DbAppointment>> {
    tracing::debug!("Listing appointments: {:?}", query);

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE ($1::BIGINT IS NULL OR customer_id = $1)
          AND ($2::DATE IS NULL OR date >= $2)
          AND ($3::DATE IS NULL OR date <= $3)
          AND ($4::VARCHAR IS NULL OR status = $4)
        ORDER BY date ASC, start_time ASC, id ASC
        OFFSET $5
        LIMIT $6
        "#
    ))
    .bind(query.customer_id)
    .bind(query.from)
    .bind(query.to)
    .bind(query.status.map(|status| status.as_str()))
    .bind(query.skip.max(0))
    .bind(query.limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn update_appointment(
    pool: &Pool<Postgres>,
    appointment: &Appointment,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Updating appointment: id={}", appointment.id);

    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET customer_id = $2, service_id = $3, date = $4, start_time = $5, end_time = $6,
            status = $7, notified = $8
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(appointment.customer_id)
    .bind(appointment.service_id)
    .bind(appointment.date)
    .bind(appointment.start)
    .bind(appointment.end)
    .bind(appointment.status.as_str())
    .bind(appointment.notified)
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn set_appointment_status(
    pool: &Pool<Postgres>,
    id: i64,
    status: &str,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Setting appointment status: id={}, status={}", id, status);

    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(updated)
}

pub async fn delete_appointment(pool: &Pool<Postgres>, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn cancel_customer_appointments(
    pool: &Pool<Postgres>,
    customer_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE appointments
        SET status = 'cancelled'
        WHERE customer_id = $1
          AND date BETWEEN $2 AND $3
          AND status IN ('pending', 'confirmed')
        "#,
    )
    .bind(customer_id)
    .bind(from)
    .bind(to)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn get_unnotified_appointments(pool: &Pool<Postgres>) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE NOT notified
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

pub async fn mark_all_notified(pool: &Pool<Postgres>) -> Result<u64> {
    let result = sqlx::query("UPDATE appointments SET notified = TRUE WHERE NOT notified")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
