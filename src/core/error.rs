// Centralized error handling for the request surface

use crate::models::api::ErrorResponse;
use crate::services::auth::AuthError;
use crate::services::lockers::TransitionError;
use crate::storage::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// API error taxonomy
///
/// Business failures are signaled as typed values by the services and
/// translated here into a status code plus a short message. Nothing is
/// retried.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unknown credential")]
    UnknownCredential,

    #[error("Invalid PIN")]
    InvalidPin,

    #[error("Locker not found")]
    LockerNotFound,

    #[error("Locker already occupied")]
    AlreadyOccupied,

    #[error("User already has a locker")]
    UserAlreadyAssigned,

    #[error("Not your locker")]
    NotOwner,

    #[error("Storage unavailable")]
    StoreUnavailable(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownCredential => StatusCode::UNAUTHORIZED,
            ApiError::InvalidPin => StatusCode::UNAUTHORIZED,
            ApiError::LockerNotFound => StatusCode::NOT_FOUND,
            ApiError::AlreadyOccupied => StatusCode::BAD_REQUEST,
            ApiError::UserAlreadyAssigned => StatusCode::BAD_REQUEST,
            ApiError::NotOwner => StatusCode::FORBIDDEN,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::StoreUnavailable(reason) = &self {
            tracing::error!(reason = %reason, "Store unavailable");
        }

        (
            self.status(),
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockerNotFound => ApiError::LockerNotFound,
            StoreError::AlreadyOccupied => ApiError::AlreadyOccupied,
            StoreError::OccupantAssigned => ApiError::UserAlreadyAssigned,
            StoreError::NotOccupant => ApiError::NotOwner,
            StoreError::Unavailable(reason) => ApiError::StoreUnavailable(reason),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownCredential => ApiError::UnknownCredential,
            AuthError::InvalidPin => ApiError::InvalidPin,
            AuthError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotFound => ApiError::LockerNotFound,
            TransitionError::AlreadyOccupied => ApiError::AlreadyOccupied,
            TransitionError::UserAlreadyAssigned => ApiError::UserAlreadyAssigned,
            TransitionError::NotOwner => ApiError::NotOwner,
            TransitionError::Store(store_err) => store_err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad body".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidPin.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UnknownCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::LockerNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::AlreadyOccupied.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UserAlreadyAssigned.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotOwner.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::StoreUnavailable("disk full".to_string()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_transition_errors_translate() {
        assert!(matches!(
            ApiError::from(TransitionError::NotOwner),
            ApiError::NotOwner
        ));
        assert!(matches!(
            ApiError::from(TransitionError::AlreadyOccupied),
            ApiError::AlreadyOccupied
        ));
    }

    #[test]
    fn test_store_unavailable_keeps_reason_out_of_message() {
        let err = ApiError::StoreUnavailable("/var/lockerd: permission denied".to_string());
        assert_eq!(err.to_string(), "Storage unavailable");
    }
}
