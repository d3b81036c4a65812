use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{LockerActionRequest, OpenResponse};
use crate::models::locker::Locker;
use crate::services::lockers;
use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

/// List handler
///
/// GET /lockers
///
/// Returns every locker, ascending by display number. The client polls
/// this endpoint for freshness; it carries no reservation semantics.
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Locker>>, ApiError> {
    let lockers = lockers::list(state.store.as_ref()).map_err(ApiError::from)?;
    Ok(Json(lockers))
}

/// Occupy handler
///
/// POST /lockers/{id}/occupy  body: {"userId": n}
pub async fn occupy_handler(
    State(state): State<Arc<AppState>>,
    Path(locker_id): Path<u64>,
    body: Result<Json<LockerActionRequest>, JsonRejection>,
) -> Result<Json<Locker>, ApiError> {
    let Json(request) = body?;

    let locker = lockers::occupy(state.store.as_ref(), locker_id, request.user_id).map_err(|e| {
        state.metrics.increment_failed();
        warn!(locker_id, user_id = request.user_id, error = %e, "Occupy rejected");
        ApiError::from(e)
    })?;

    state.metrics.increment_occupies();

    info!(
        locker_id,
        user_id = request.user_id,
        display_number = locker.display_number,
        "Locker occupied"
    );

    Ok(Json(locker))
}

/// Vacate handler
///
/// POST /lockers/{id}/vacate  body: {"userId": n}
pub async fn vacate_handler(
    State(state): State<Arc<AppState>>,
    Path(locker_id): Path<u64>,
    body: Result<Json<LockerActionRequest>, JsonRejection>,
) -> Result<Json<Locker>, ApiError> {
    let Json(request) = body?;

    let locker = lockers::vacate(state.store.as_ref(), locker_id, request.user_id).map_err(|e| {
        state.metrics.increment_failed();
        warn!(locker_id, user_id = request.user_id, error = %e, "Vacate rejected");
        ApiError::from(e)
    })?;

    state.metrics.increment_vacates();

    info!(
        locker_id,
        user_id = request.user_id,
        display_number = locker.display_number,
        "Locker vacated"
    );

    Ok(Json(locker))
}

/// Open handler
///
/// POST /lockers/{id}/open  body: {"userId": n}
///
/// Grants a one-shot unlock to the current occupant; occupancy does not
/// change.
pub async fn open_handler(
    State(state): State<Arc<AppState>>,
    Path(locker_id): Path<u64>,
    body: Result<Json<LockerActionRequest>, JsonRejection>,
) -> Result<Json<OpenResponse>, ApiError> {
    let Json(request) = body?;

    let locker = lockers::open(state.store.as_ref(), locker_id, request.user_id).map_err(|e| {
        state.metrics.increment_failed();
        warn!(locker_id, user_id = request.user_id, error = %e, "Open rejected");
        ApiError::from(e)
    })?;

    state.metrics.increment_opens();

    Ok(Json(OpenResponse {
        success: true,
        message: format!("Locker {} opened successfully", locker.display_number),
    }))
}
