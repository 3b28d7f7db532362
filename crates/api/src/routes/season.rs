use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/seasons", post(handlers::season::create_season))
        .route("/api/seasons/current", get(handlers::season::current_season))
        .route(
            "/api/seasons/:id/quests",
            get(handlers::season::list_quests).post(handlers::season::create_quest),
        )
        .route(
            "/api/seasons/:id/rewards",
            get(handlers::season::reward_track).post(handlers::season::create_reward),
        )
        .route(
            "/api/seasons/:id/progress",
            get(handlers::season::user_progress),
        )
        .route("/api/seasons/:id/level", get(handlers::season::user_level))
        .route("/api/seasons/:id/claim", post(handlers::season::claim_reward))
        .route(
            "/api/quests/:id/progress",
            post(handlers::season::add_progress),
        )
}
