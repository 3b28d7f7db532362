use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route("/api/events/:id", get(handlers::events::get_event))
        .route("/api/events/:id/submit", post(handlers::events::submit_event))
        .route(
            "/api/events/:id/approve",
            post(handlers::events::approve_event),
        )
        .route("/api/events/:id/reject", post(handlers::events::reject_event))
        .route("/api/events/:id/logs", get(handlers::events::event_logs))
}
