pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

pub use middleware::require_user;
pub use rest::ApiDoc;

/// Builds the API router with every learner-scoped route behind the
/// `require_user` middleware. CORS and Swagger UI are layered on by the
/// server binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/profile",
            get(rest::get_profile_handler).put(rest::put_profile_handler),
        )
        .route("/chat", post(rest::chat_handler))
        .route(
            "/chat/history",
            get(rest::get_chat_history_handler).delete(rest::delete_chat_history_handler),
        )
        .route("/sessions/start", post(rest::start_session_handler))
        .route("/sessions/end", post(rest::end_session_handler))
        .route("/quiz", post(rest::generate_quiz_handler))
        .route("/quiz/results", post(rest::record_quiz_result_handler))
        .route("/analytics", get(rest::analytics_handler))
        .route("/data", delete(rest::reset_handler))
        .route("/export", get(rest::export_handler))
        .layer(axum_middleware::from_fn(require_user))
        .with_state(app_state)
}
