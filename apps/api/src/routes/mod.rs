pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extraction::handlers::handle_extract;
use crate::generation::handlers::handle_generate;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/extract", post(handle_extract))
        .route("/generate", post(handle_generate))
        .with_state(state)
}
