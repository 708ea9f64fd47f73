use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use std::sync::Arc;
use turnero_core::models::block::{CreateBlockRequest, ScheduleBlock};

use super::params::OptionalRangeParams;
use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn list_blocks(
    State(state): State<Arc<ApiState>>,
    Query(range): Query<OptionalRangeParams>,
) -> Result<Json<Vec<ScheduleBlock>>, AppError> {
    Ok(Json(state.calendar.list_blocks(range.from, range.to).await?))
}

#[axum::debug_handler]
pub async fn create_block(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<ScheduleBlock>), AppError> {
    let block = state.calendar.create_block(&payload).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

#[axum::debug_handler]
pub async fn blocks_on_date(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Vec<ScheduleBlock>>, AppError> {
    Ok(Json(state.calendar.blocks_on(date).await?))
}

#[axum::debug_handler]
pub async fn delete_block(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.calendar.delete_block(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
