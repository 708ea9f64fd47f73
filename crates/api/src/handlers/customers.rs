use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use turnero_core::{
    errors::TurnoError,
    models::{
        appointment::{WeeklyCancelResponse, WeeklyCheckResponse},
        customer::{CreateCustomerRequest, Customer, UpdateCustomerRequest},
    },
};

use super::params::Pagination;
use crate::{ApiState, middleware::error_handling::AppError};

fn not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Customer with ID {} not found", id))
}

fn require(field: &str, value: &str) -> Result<(), TurnoError> {
    if value.trim().is_empty() {
        return Err(TurnoError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_customers(
    State(state): State<Arc<ApiState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.directory.list_customers(page.skip, page.limit).await?))
}

#[axum::debug_handler]
pub async fn create_customer(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    require("name", &payload.name)?;
    require("phone", &payload.phone)?;

    let customer = state
        .directory
        .create_customer(&CreateCustomerRequest {
            name: payload.name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
        })
        .await?;
    info!("Created customer {}", customer.id);

    Ok((StatusCode::CREATED, Json(customer)))
}

#[axum::debug_handler]
pub async fn get_customer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .directory
        .get_customer(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer))
}

#[axum::debug_handler]
pub async fn update_customer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    if let Some(name) = &payload.name {
        require("name", name)?;
    }
    if let Some(phone) = &payload.phone {
        require("phone", phone)?;
    }

    let customer = state
        .directory
        .update_customer(id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(customer))
}

#[axum::debug_handler]
pub async fn delete_customer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.directory.delete_customer(id).await? {
        return Err(not_found(id).into());
    }
    info!("Deleted customer {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the customer holds a pending or confirmed appointment in the ISO
/// week containing `date`.
#[axum::debug_handler]
pub async fn weekly_check(
    State(state): State<Arc<ApiState>>,
    Path((id, date)): Path<(i64, NaiveDate)>,
) -> Result<Json<WeeklyCheckResponse>, AppError> {
    let has_appointment = state.calendar.has_weekly_appointment(id, date).await?;
    Ok(Json(WeeklyCheckResponse {
        customer_id: id,
        date,
        has_appointment,
    }))
}

#[axum::debug_handler]
pub async fn cancel_week(
    State(state): State<Arc<ApiState>>,
    Path((id, date)): Path<(i64, NaiveDate)>,
) -> Result<Json<WeeklyCancelResponse>, AppError> {
    let cancelled = state.calendar.cancel_customer_week(id, date).await?;
    Ok(Json(WeeklyCancelResponse {
        customer_id: id,
        date,
        cancelled,
    }))
}
