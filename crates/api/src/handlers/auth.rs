use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::{info, warn};
use turnero_core::models::staff::{LoginRequest, LoginResponse};

use crate::{
    ApiState,
    middleware::{auth, error_handling::AppError},
};

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = auth::authenticate(state.directory.as_ref(), &payload.username, &payload.password)
        .await
        .inspect_err(|_| warn!("Failed login for `{}`", payload.username))?;

    info!("Staff user {} signed in", user.username);
    Ok(Json(LoginResponse { user }))
}
