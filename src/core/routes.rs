// HTTP routes configuration

use crate::core::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth
        .route("/auth/login", post(crate::handlers::auth::login_handler))

        // Lockers
        .route("/lockers", get(crate::handlers::lockers::list_handler))
        .route("/lockers/{id}/occupy", post(crate::handlers::lockers::occupy_handler))
        .route("/lockers/{id}/vacate", post(crate::handlers::lockers::vacate_handler))
        .route("/lockers/{id}/open", post(crate::handlers::lockers::open_handler))

        // Operational endpoints
        .route("/health", get(crate::handlers::health::health_handler))
        .route("/metrics", get(crate::handlers::metrics::metrics_handler))

        // 404 fallback for all unmatched routes
        .fallback(crate::handlers::fallback::fallback_handler)

        .with_state(state)
}
