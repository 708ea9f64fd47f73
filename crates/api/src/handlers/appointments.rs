use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::sync::Arc;
use turnero_core::{
    errors::TurnoError,
    models::{
        appointment::{
            Appointment, AvailabilityResponse, BookingRequest, StatsResponse, StatusChangeRequest,
            UpdateAppointmentRequest,
        },
        block::SlotsResponse,
        time_format,
    },
    schedule::Interval,
};

use super::params::{AppointmentFilter, AvailabilityParams, DateParams, RangeParams};
use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let appointments = state.calendar.list_appointments(&filter.into()).await?;
    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.calendar.book(&payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Reports whether the interval could be booked now, naming the failed rule
/// when it could not.
#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let interval = Interval::new(params.date, params.start, params.end)?;

    let reason = match state.calendar.ensure_available(&interval).await {
        Ok(()) => None,
        Err(TurnoError::Admission(rejection)) => Some(rejection.code().to_string()),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(AvailabilityResponse {
        date: interval.date,
        start: interval.start,
        end: interval.end,
        available: reason.is_none(),
        reason,
    }))
}

#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<DateParams>,
) -> Result<Json<SlotsResponse>, AppError> {
    let slots = state.calendar.list_available_slots(params.date).await?;
    let blocks = state.calendar.blocks_on(params.date).await?;

    Ok(Json(SlotsResponse {
        date: params.date,
        slots: slots.into_iter().map(time_format::format).collect(),
        blocks,
    }))
}

#[axum::debug_handler]
pub async fn day_agenda(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(state.calendar.day_agenda(date).await?))
}

#[axum::debug_handler]
pub async fn week_agenda(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(state.calendar.week_agenda(date).await?))
}

#[axum::debug_handler]
pub async fn statistics(
    State(state): State<Arc<ApiState>>,
    Query(range): Query<RangeParams>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.calendar.statistics(range.from, range.to).await?;
    Ok(Json(StatsResponse {
        from: range.from,
        to: range.to,
        stats,
    }))
}

#[axum::debug_handler]
pub async fn unnotified(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    Ok(Json(state.calendar.unnotified().await?))
}

#[axum::debug_handler]
pub async fn mark_notified(State(state): State<Arc<ApiState>>) -> Result<Json<Value>, AppError> {
    let marked = state.calendar.mark_all_notified().await?;
    Ok(Json(json!({ "marked": marked })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.calendar.get_appointment(id).await?))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.calendar.update_appointment(id, &payload).await?))
}

#[axum::debug_handler]
pub async fn change_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusChangeRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.calendar.transition_status(id, payload.status).await?))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.calendar.delete_appointment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
