//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::middleware::map_response;
use axum::routing::{get, post, put};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::progress_events;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/modules/{*path}", get(handlers::modules::get_module))
        .route("/api/progress", get(handlers::progress::get_progress))
        .route(
            "/api/progress/done/{slug}",
            post(handlers::progress::toggle_done),
        )
        .route(
            "/api/progress/quiz/{slug}/total",
            put(handlers::progress::put_quiz_total),
        )
        .route(
            "/api/progress/quiz/{slug}/answers",
            get(handlers::progress::get_quiz_answer).put(handlers::progress::put_quiz_answer),
        );

    Router::new()
        .merge(api_routes)
        .route("/ws/progress", get(progress_events::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(map_response(security::security_headers)),
        )
        .with_state(state)
}
