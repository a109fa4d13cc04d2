use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::photos::handlers;
use crate::features::photos::services::PhotoService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Gallery listing and capture upload, open to any guest with the event code
pub fn public_routes(service: Arc<PhotoService>) -> Router {
    Router::new()
        .route(
            "/api/events/{id}/photos",
            get(handlers::list_photos)
                .post(handlers::upload_photo)
                // Multipart overhead on top of the photo itself
                .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}

/// Owner-only photo management
pub fn protected_routes(service: Arc<PhotoService>) -> Router {
    Router::new()
        .route(
            "/api/host/events/{id}/photos/{photo_id}",
            delete(handlers::delete_photo),
        )
        .route("/api/host/events/{id}/export", post(handlers::export_photos))
        .with_state(service)
}
