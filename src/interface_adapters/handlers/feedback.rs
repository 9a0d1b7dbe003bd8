use crate::interface_adapters::protocol::FeedbackResponse;
use crate::interface_adapters::state::AppState;
use axum::{Json, extract::State};
use std::sync::Arc;

// Current toast message, or null once it has been dismissed.
pub async fn current_feedback(State(state): State<Arc<AppState>>) -> Json<FeedbackResponse> {
    Json(FeedbackResponse {
        message: state.feedback.current().await,
    })
}

pub async fn health() -> &'static str {
    "ok"
}
