pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::cancel::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/cancel", post(handlers::handle_cancel_action))
        .with_state(state)
}
