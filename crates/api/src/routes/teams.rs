use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/teams", post(handlers::teams::create_team))
        .route("/api/teams/:id", get(handlers::teams::get_team))
        .route("/api/teams/:id/apply", post(handlers::teams::apply_to_team))
        .route("/api/teams/:id/invite", post(handlers::teams::invite_to_team))
        .route("/api/teams/:id/leave", post(handlers::teams::leave_team))
        .route(
            "/api/team-requests/:id/accept",
            post(handlers::teams::accept_request),
        )
        .route(
            "/api/team-requests/:id/reject",
            post(handlers::teams::reject_request),
        )
}
