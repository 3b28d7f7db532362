use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/spaces",
            get(handlers::spaces::list_spaces).post(handlers::spaces::create_space),
        )
        .route("/api/spaces/:id", get(handlers::spaces::get_space))
        .route(
            "/api/spaces/:id/bookings",
            post(handlers::spaces::create_booking),
        )
        .route(
            "/api/spaces/:id/availability",
            get(handlers::spaces::check_availability),
        )
        .route(
            "/api/spaces/:id/suggestions",
            get(handlers::spaces::suggest_slots),
        )
        .route(
            "/api/spaces/:id/schedule",
            get(handlers::spaces::week_schedule),
        )
        .route("/api/bookings/:id", get(handlers::spaces::get_booking))
        .route(
            "/api/bookings/:id/approve",
            post(handlers::spaces::approve_booking),
        )
        .route(
            "/api/bookings/:id/reject",
            post(handlers::spaces::reject_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::spaces::cancel_booking),
        )
        .route("/api/bookings/:id/logs", get(handlers::spaces::booking_logs))
}
