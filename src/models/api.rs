use crate::models::locker::Locker;
use crate::models::user::User;
use serde::{Deserialize, Serialize};

/// Body for POST /auth/login
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub rfid: String,
    pub pin: String,
}

/// Body for the occupy/vacate/open locker actions
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerActionRequest {
    pub user_id: u64,
}

/// Response for POST /auth/login
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub assigned_locker: Option<Locker>,
}

/// Acknowledgement for POST /lockers/{id}/open
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenResponse {
    pub success: bool,
    pub message: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
