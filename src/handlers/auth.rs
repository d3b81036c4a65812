use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{AuthResponse, LoginRequest};
use crate::services::auth;
use axum::extract::rejection::JsonRejection;
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{info, warn};

/// Login handler
///
/// POST /auth/login  body: {"rfid": "...", "pin": "..."}
///
/// Resolves the credential pair to a user record and the locker they hold,
/// if any. Unknown credentials auto-register when the policy allows it.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = body?;

    let outcome = auth::authenticate(
        state.store.as_ref(),
        &request.rfid,
        &request.pin,
        state.config.auth.auto_register,
    )
    .map_err(|e| {
        state.metrics.increment_failed();
        warn!(rfid = %request.rfid, error = %e, "Login rejected");
        ApiError::from(e)
    })?;

    state.metrics.increment_logins();

    info!(
        user_id = outcome.user.id,
        rfid = %outcome.user.rfid,
        has_locker = outcome.assigned_locker.is_some(),
        "Login successful"
    );

    Ok(Json(AuthResponse {
        user: outcome.user,
        assigned_locker: outcome.assigned_locker,
    }))
}

#[cfg(test)]
mod tests {
    use crate::core::config::Config;
    use crate::core::routes::build_router;
    use crate::core::state::AppState;
    use crate::models::api::AuthResponse;
    use crate::storage::{JournalStore, Storage};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir, auto_register: bool) -> (Router, Arc<JournalStore>) {
        let toml = format!(
            "[server]\nport = 8080\n[auth]\nauto_register = {}\n",
            auto_register
        );
        let config: Config = toml::from_str(&toml).unwrap();

        let store = Arc::new(
            JournalStore::open(&dir.path().join("store.journal")).unwrap(),
        );
        store.seed_lockers(10, 10).unwrap();
        store.create_user("12345", "1234", "Demo User").unwrap();

        let state = AppState::new(config, store.clone());
        (build_router(Arc::new(state)), store)
    }

    fn login_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_known_user() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir, true);

        let response = app
            .oneshot(login_request(r#"{"rfid":"12345","pin":"1234"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let auth: AuthResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(auth.user.rfid, "12345");
        assert_eq!(auth.user.name, "Demo User");
        assert!(auth.assigned_locker.is_none());

        // PIN is redacted from the response
        let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(raw["user"].get("pin").is_none());
    }

    #[tokio::test]
    async fn test_login_wrong_pin_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir, true);

        let response = app
            .oneshot(login_request(r#"{"rfid":"12345","pin":"9999"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid PIN");
    }

    #[tokio::test]
    async fn test_login_unknown_rfid_auto_registers() {
        let dir = TempDir::new().unwrap();
        let (app, store) = test_app(&dir, true);

        let response = app
            .oneshot(login_request(r#"{"rfid":"X1","pin":"0000"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let auth: AuthResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(auth.user.name, "User X1");
        assert!(auth.assigned_locker.is_none());
        assert!(store.find_user_by_rfid("X1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_unknown_rfid_rejected_when_disabled() {
        let dir = TempDir::new().unwrap();
        let (app, store) = test_app(&dir, false);

        let response = app
            .oneshot(login_request(r#"{"rfid":"X1","pin":"0000"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(store.find_user_by_rfid("X1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_returns_assigned_locker() {
        let dir = TempDir::new().unwrap();
        let (app, store) = test_app(&dir, true);

        let user = store.find_user_by_rfid("12345").unwrap().unwrap();
        store.claim_locker(7, user.id).unwrap();

        let response = app
            .oneshot(login_request(r#"{"rfid":"12345","pin":"1234"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let auth: AuthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(auth.assigned_locker.unwrap().id, 7);
    }

    #[tokio::test]
    async fn test_login_malformed_body_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir, true);

        let response = app
            .oneshot(login_request(r#"{"rfid":"12345""#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
