use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::metrics::collector::MetricsSnapshot;
use axum::{extract::State, response::Json};
use std::sync::Arc;

/// Metrics handler
///
/// GET /metrics
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsSnapshot>, ApiError> {
    let snapshot = state
        .metrics
        .get_snapshot(state.store.as_ref())
        .map_err(ApiError::from)?;

    Ok(Json(snapshot))
}
