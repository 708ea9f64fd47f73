use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers::appointments};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            get(appointments::list_appointments).post(appointments::book_appointment),
        )
        .route(
            "/api/appointments/availability",
            get(appointments::check_availability),
        )
        .route("/api/appointments/slots", get(appointments::available_slots))
        .route("/api/appointments/day/:date", get(appointments::day_agenda))
        .route("/api/appointments/week/:date", get(appointments::week_agenda))
        .route("/api/appointments/stats", get(appointments::statistics))
        .route("/api/appointments/unnotified", get(appointments::unnotified))
        .route("/api/appointments/notified", put(appointments::mark_notified))
        .route(
            "/api/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/api/appointments/:id/status", put(appointments::change_status))
}
