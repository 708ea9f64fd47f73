use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::info;
use turnero_core::{
    errors::TurnoError,
    models::staff::{CreateStaffRequest, NewStaffUser, StaffUser, UpdateStaffRequest},
};

use super::params::Pagination;
use crate::{
    ApiState,
    middleware::{auth, error_handling::AppError},
};

fn not_found(id: i64) -> TurnoError {
    TurnoError::NotFound(format!("Staff user with ID {} not found", id))
}

#[axum::debug_handler]
pub async fn list_staff(
    State(state): State<Arc<ApiState>>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<StaffUser>>, AppError> {
    Ok(Json(state.directory.list_staff(page.skip, page.limit).await?))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<StaffUser>), AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(TurnoError::Validation("username and password are required".to_string()).into());
    }

    // Hash password before it reaches the store
    let password_hash = auth::hash_password(&payload.password)?;
    let user = state
        .directory
        .create_staff(&NewStaffUser {
            name: payload.name,
            username: payload.username.trim().to_string(),
            password_hash,
            role: payload.role,
        })
        .await?;
    info!("Created staff user {} ({})", user.username, user.role);

    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<StaffUser>, AppError> {
    let user = state
        .directory
        .get_staff(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_staff(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStaffRequest>,
) -> Result<Json<StaffUser>, AppError> {
    let user = state
        .directory
        .update_staff(id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.directory.delete_staff(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
