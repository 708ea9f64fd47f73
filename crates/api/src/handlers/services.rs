use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use turnero_core::{
    errors::TurnoError,
    models::service::{CreateServiceRequest, Service, UpdateServiceRequest},
};

use super::params::Pagination;
use crate::{ApiState, middleware::error_handling::AppError};

fn not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Service with ID {} not found", id))
}

fn validate(
    name: Option<&str>,
    duration_minutes: Option<i32>,
    price: Option<i64>,
) -> Result<(), TurnoError> {
    if name.is_some_and(|name| name.trim().is_empty()) {
        return Err(TurnoError::Validation("name must not be empty".to_string()));
    }
    if duration_minutes.is_some_and(|minutes| minutes <= 0) {
        return Err(TurnoError::Validation("duration_minutes must be positive".to_string()));
    }
    if price.is_some_and(|price| price < 0) {
        return Err(TurnoError::Validation("price must not be negative".to_string()));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Service>>, AppError> {
    Ok(Json(state.directory.list_services(page.skip, page.limit).await?))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    validate(Some(&payload.name), Some(payload.duration_minutes), Some(payload.price))?;
    let service = state.directory.create_service(&payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<Service>, AppError> {
    let service = state
        .directory
        .get_service(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateServiceRequest>,
) -> Result<Json<Service>, AppError> {
    validate(payload.name.as_deref(), payload.duration_minutes, payload.price)?;
    let service = state
        .directory
        .update_service(id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(service))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.directory.delete_service(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
