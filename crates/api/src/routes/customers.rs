use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::customers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/api/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route("/api/customers/:id/week/:date", get(customers::weekly_check))
        .route(
            "/api/customers/:id/week/:date/cancel",
            post(customers::cancel_week),
        )
}
