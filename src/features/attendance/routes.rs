use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::features::attendance::handlers;
use crate::features::attendance::services::FormService;

/// Create routes for the attendance feature: the HTML page and its JSON API
pub fn routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/", get(handlers::new_form))
        .route(
            "/forms/{id}",
            get(handlers::show_form).post(handlers::post_form),
        )
        .route("/api/forms", post(handlers::create_form))
        .route(
            "/api/forms/{id}",
            get(handlers::get_form).delete(handlers::delete_form),
        )
        .route("/api/forms/{id}/identity", patch(handlers::update_identity))
        .route("/api/forms/{id}/province", put(handlers::select_province))
        .route("/api/forms/{id}/city", put(handlers::select_city))
        .route("/api/forms/{id}/district", put(handlers::select_district))
        .route("/api/forms/{id}/village", put(handlers::select_village))
        .route(
            "/api/forms/{id}/levels/{level}/reload",
            post(handlers::reload_level),
        )
        .route("/api/forms/{id}/submit", post(handlers::submit_form))
        .route(
            "/api/forms/{id}/success/dismiss",
            post(handlers::dismiss_success),
        )
        .route(
            "/api/forms/{id}/alert/dismiss",
            post(handlers::dismiss_alert),
        )
        .with_state(service)
}
