use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/points", post(handlers::points::post_points))
        .route("/api/points/revoke", post(handlers::points::revoke_points))
        .route(
            "/api/leaderboard/students",
            get(handlers::points::student_leaderboard),
        )
        .route(
            "/api/leaderboard/shanyraqs",
            get(handlers::points::shanyraq_leaderboard),
        )
}
