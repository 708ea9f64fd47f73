use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;

use crate::{ApiState, handlers::blocks};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/blocks", get(blocks::list_blocks).post(blocks::create_block))
        .route("/api/blocks/date/:date", get(blocks::blocks_on_date))
        .route("/api/blocks/:id", delete(blocks::delete_block))
}
