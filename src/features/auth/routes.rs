use axum::{routing::get, Router};

use crate::features::auth::handlers;

/// Routes that require a verified host token
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/me", get(handlers::get_me))
}
