use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers::staff};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/api/staff/:id",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
}
