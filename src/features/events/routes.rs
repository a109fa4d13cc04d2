use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::events::handlers;
use crate::features::events::services::EventService;

/// Routes reachable by guests holding an event code
pub fn public_routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/api/events/access", post(handlers::access_event))
        .route("/api/events/{id}", get(handlers::get_event))
        .route("/api/events/{id}/qr", get(handlers::get_event_qr))
        .with_state(service)
}

/// Host routes; callers must carry a verified token
pub fn protected_routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route(
            "/api/host/events",
            post(handlers::create_event).get(handlers::list_events),
        )
        .route(
            "/api/host/events/{id}",
            get(handlers::get_owned_event).delete(handlers::delete_event),
        )
        .with_state(service)
}
