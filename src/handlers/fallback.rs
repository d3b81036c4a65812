use crate::models::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

pub async fn fallback_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "Unknown endpoint. Valid endpoints: /auth/login, /lockers, /health, /metrics"
                .to_string(),
        }),
    )
        .into_response()
}
