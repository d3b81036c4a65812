pub mod journal_store;

pub use journal_store::JournalStore;

use crate::models::locker::Locker;
use crate::models::user::User;
use serde::Deserialize;
use thiserror::Error;

/// Failures surfaced by the persistent store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Credential already registered")]
    DuplicateCredential,

    #[error("Locker not found")]
    LockerNotFound,

    #[error("Locker already occupied")]
    AlreadyOccupied,

    #[error("User already holds a locker")]
    OccupantAssigned,

    #[error("User is not the occupant")]
    NotOccupant,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A default account inserted when the user table is seeded.
#[derive(Clone, Debug, Deserialize)]
pub struct SeedUser {
    pub rfid: String,
    pub pin: String,
    pub name: String,
}

/// Durable table of users and lockers.
///
/// The store performs its own conditional occupancy updates
/// (`claim_locker`/`release_locker`): the precondition check and the write
/// land as a single atomic step, so two concurrent claims of one free
/// locker cannot both succeed. Ownership and policy decisions beyond that
/// live in the service layer.
pub trait Storage: Send + Sync {
    /// Look up a user by RFID credential.
    fn find_user_by_rfid(&self, rfid: &str) -> Result<Option<User>, StoreError>;

    /// Create a user. Fails with `DuplicateCredential` if the rfid exists.
    fn create_user(&self, rfid: &str, pin: &str, name: &str) -> Result<User, StoreError>;

    /// Look up a user by ID.
    fn find_user(&self, id: u64) -> Result<Option<User>, StoreError>;

    /// All lockers, ascending by display number.
    fn list_lockers(&self) -> Result<Vec<Locker>, StoreError>;

    /// Look up a locker by ID.
    fn find_locker(&self, id: u64) -> Result<Option<Locker>, StoreError>;

    /// The locker currently held by the given user, if any.
    fn find_locker_by_occupant(&self, user_id: u64) -> Result<Option<Locker>, StoreError>;

    /// Mark a free locker as held by the given user.
    ///
    /// Fails with `LockerNotFound`, `AlreadyOccupied` (the locker is held,
    /// including when a concurrent claim won the race), or
    /// `OccupantAssigned` (the user already holds another locker).
    fn claim_locker(&self, locker_id: u64, user_id: u64) -> Result<Locker, StoreError>;

    /// Release a locker held by the given user.
    ///
    /// Fails with `LockerNotFound` or `NotOccupant`.
    fn release_locker(&self, locker_id: u64, user_id: u64) -> Result<Locker, StoreError>;

    /// Create `count` lockers numbered 1..=count with row/column locations.
    ///
    /// Idempotent: runs only when the locker table is empty. Returns the
    /// number of lockers created.
    fn seed_lockers(&self, count: u32, per_row: u32) -> Result<usize, StoreError>;

    /// Insert the supplied default accounts.
    ///
    /// Idempotent: runs only when the user table is empty. Returns the
    /// number of users created.
    fn seed_users(&self, defaults: &[SeedUser]) -> Result<usize, StoreError>;
}
