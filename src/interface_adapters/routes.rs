use crate::interface_adapters::handlers::feedback::{current_feedback, health};
use crate::interface_adapters::handlers::guests::{
    add_guest, confirm_guest, list_guests, refresh_guests, update_photo,
};
use crate::interface_adapters::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/health", get(health))
        .route("/guests", get(list_guests).post(add_guest))
        .route("/guests/refresh", post(refresh_guests))
        .route("/guests/{name}/confirm", post(confirm_guest))
        .route("/guests/{name}/photo", put(update_photo))
        .route("/feedback", get(current_feedback))
        .layer(upload_limit)
        .with_state(state)
}
