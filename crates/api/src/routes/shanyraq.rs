use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/shanyraqs",
            get(handlers::shanyraq::list_shanyraqs).post(handlers::shanyraq::create_shanyraq),
        )
        .route("/api/shanyraqs/:id", get(handlers::shanyraq::get_shanyraq))
        .route(
            "/api/shanyraqs/:id/join",
            post(handlers::shanyraq::join_shanyraq),
        )
        .route(
            "/api/shanyraqs/:id/recalculate",
            post(handlers::shanyraq::recalculate),
        )
        .route(
            "/api/shanyraqs/recalculate-all",
            post(handlers::shanyraq::recalculate_all),
        )
}
