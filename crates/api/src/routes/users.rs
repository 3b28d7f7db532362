use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users/:id", get(handlers::users::get_user))
        .route(
            "/api/users/:id/recalculate",
            post(handlers::users::recalculate_user),
        )
        .route("/api/users/:id/ledger", get(handlers::points::user_ledger))
        .route(
            "/api/users/:id/contributions",
            get(handlers::points::contribution_breakdown),
        )
}
