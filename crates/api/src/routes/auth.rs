use axum::{Router, routing::post};
use std::sync::Arc;

use crate::{ApiState, handlers::auth};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/auth/login", post(auth::login))
}
