mod chat;
mod oncall;
mod root;

use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::index).post(chat::handle_event))
        .route("/health", get(root::health))
        .route("/oncall", get(oncall::today))
        .fallback(root::handler_404)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
