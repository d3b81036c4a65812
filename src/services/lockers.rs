use crate::models::locker::Locker;
use crate::storage::{Storage, StoreError};
use thiserror::Error;
use tracing::info;

/// Transition failures reported to the request surface
#[derive(Error, Debug)]
pub enum TransitionError {
    #[error("Locker not found")]
    NotFound,

    #[error("Locker already occupied")]
    AlreadyOccupied,

    #[error("User already has a locker")]
    UserAlreadyAssigned,

    #[error("Not your locker")]
    NotOwner,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransitionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockerNotFound => TransitionError::NotFound,
            StoreError::AlreadyOccupied => TransitionError::AlreadyOccupied,
            StoreError::OccupantAssigned => TransitionError::UserAlreadyAssigned,
            StoreError::NotOccupant => TransitionError::NotOwner,
            other => TransitionError::Store(other),
        }
    }
}

/// All lockers, ascending by display number.
pub fn list(store: &dyn Storage) -> Result<Vec<Locker>, TransitionError> {
    Ok(store.list_lockers()?)
}

/// Claim a free locker for a user.
///
/// The store applies the free/one-per-user preconditions and the write as a
/// single conditional update, so a stale client cannot slip past them.
pub fn occupy(
    store: &dyn Storage,
    locker_id: u64,
    user_id: u64,
) -> Result<Locker, TransitionError> {
    Ok(store.claim_locker(locker_id, user_id)?)
}

/// Release a locker held by the requesting user.
pub fn vacate(
    store: &dyn Storage,
    locker_id: u64,
    user_id: u64,
) -> Result<Locker, TransitionError> {
    Ok(store.release_locker(locker_id, user_id)?)
}

/// Send a one-shot unlock pulse to a locker held by the requesting user.
///
/// Idempotent and side-effect-free on the data model: occupancy is
/// revalidated against the live store but never changed. Real hardware is
/// out of scope, so the pulse is a structured log line.
pub fn open(store: &dyn Storage, locker_id: u64, user_id: u64) -> Result<Locker, TransitionError> {
    let locker = store
        .find_locker(locker_id)?
        .ok_or(TransitionError::NotFound)?;

    if locker.occupant_id != Some(user_id) {
        return Err(TransitionError::NotOwner);
    }

    info!(
        locker_id = locker.id,
        display_number = locker.display_number,
        user_id,
        "Unlock pulse sent"
    );

    Ok(locker)
}
