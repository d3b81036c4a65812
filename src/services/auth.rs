use crate::models::locker::Locker;
use crate::models::user::User;
use crate::storage::{Storage, StoreError};
use crate::utils::auth::constant_time_eq;
use thiserror::Error;
use tracing::debug;

/// Login failures reported to the request surface
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unknown credential")]
    UnknownCredential,

    #[error("Invalid PIN")]
    InvalidPin,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a successful login
#[derive(Debug)]
pub struct AuthOutcome {
    pub user: User,
    pub assigned_locker: Option<Locker>,
}

/// Resolve a credential pair to a user record and their assigned locker.
///
/// When `auto_register` is set, an unseen rfid creates a new account with a
/// generated display name and counts as authenticated. A known rfid must
/// present the stored PIN.
pub fn authenticate(
    store: &dyn Storage,
    rfid: &str,
    pin: &str,
    auto_register: bool,
) -> Result<AuthOutcome, AuthError> {
    let user = match store.find_user_by_rfid(rfid)? {
        Some(user) => verify_pin(user, pin)?,
        None if auto_register => {
            debug!(rfid = %rfid, "Unseen credential, auto-registering");
            match store.create_user(rfid, pin, &format!("User {}", rfid)) {
                Ok(user) => user,
                // Lost a race against a concurrent first login with the
                // same rfid; fall back to the record that won.
                Err(StoreError::DuplicateCredential) => {
                    let user = store
                        .find_user_by_rfid(rfid)?
                        .ok_or(AuthError::UnknownCredential)?;
                    verify_pin(user, pin)?
                }
                Err(err) => return Err(err.into()),
            }
        }
        None => return Err(AuthError::UnknownCredential),
    };

    let assigned_locker = store.find_locker_by_occupant(user.id)?;

    Ok(AuthOutcome {
        user,
        assigned_locker,
    })
}

fn verify_pin(user: User, pin: &str) -> Result<User, AuthError> {
    if constant_time_eq(pin, &user.pin) {
        Ok(user)
    } else {
        Err(AuthError::InvalidPin)
    }
}
