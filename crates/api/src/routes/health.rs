use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;
use turnero_core::models::time_format;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    opening: String,
    closing: String,
    slot_minutes: u32,
    lead_minutes: u32,
}

#[derive(Serialize)]
struct VersionResponse {
    name: &'static str,
    version: &'static str,
}

/// Liveness plus the calendar rules the server is running with.
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let config = state.calendar.config();
    Json(HealthResponse {
        status: "ok",
        opening: time_format::format(config.opening),
        closing: time_format::format(config.closing),
        slot_minutes: config.slot_minutes,
        lead_minutes: config.lead_minutes,
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
