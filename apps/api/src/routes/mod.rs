pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::cv::handlers;
use crate::state::AppState;

/// Uploads are capped at 5MB by the photo gate; the body limit sits above
/// that so the gate, not the framework, produces the rejection.
const BODY_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/cvs", get(handlers::handle_list_cvs))
        .route("/api/cv", post(handlers::handle_create_cv))
        .route(
            "/api/cv/:id",
            get(handlers::handle_get_cv)
                .put(handlers::handle_update_cv)
                .delete(handlers::handle_delete_cv),
        )
        .route("/api/cv/:id/photo", delete(handlers::handle_delete_photo))
        .route("/api/image/:filename", get(handlers::handle_get_image))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
