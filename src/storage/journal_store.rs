use crate::journal::journal::{Journal, JournalOp};
use crate::models::locker::Locker;
use crate::models::user::User;
use crate::storage::{SeedUser, Storage, StoreError};
use anyhow::{Context, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Journal-backed store for users and lockers.
///
/// Tables live in DashMaps; durability comes from the write-ahead journal:
/// every mutation is appended to the journal before the tables change, and
/// `open` replays the journal to rebuild the tables. A failed append leaves
/// the in-memory state untouched and surfaces as `StoreError::Unavailable`.
///
/// `claim_locker` and `release_locker` both lock the locker entry first and
/// touch the occupant index second, keeping lock order consistent.
pub struct JournalStore {
    users: DashMap<u64, User>,
    rfid_index: DashMap<String, u64>,
    lockers: DashMap<u64, Locker>,
    /// user id -> locker id; enforces the one-locker-per-user invariant
    occupants: DashMap<u64, u64>,
    next_user_id: AtomicU64,
    next_locker_id: AtomicU64,
    journal: Journal,
}

impl JournalStore {
    /// Open the store, replaying the journal at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let journal = Journal::new(path.to_path_buf())
            .context("Failed to initialize store journal")?;

        let operations = journal.replay().context("Failed to replay store journal")?;

        let store = Self {
            users: DashMap::new(),
            rfid_index: DashMap::new(),
            lockers: DashMap::new(),
            occupants: DashMap::new(),
            next_user_id: AtomicU64::new(1),
            next_locker_id: AtomicU64::new(1),
            journal,
        };

        for op in &operations {
            store.apply(op);
        }

        info!(
            operations_replayed = operations.len(),
            users_loaded = store.user_count(),
            lockers_loaded = store.locker_count(),
            "Journal replay completed"
        );

        Ok(store)
    }

    /// Apply a replayed operation directly to the tables, without
    /// re-journaling it.
    fn apply(&self, op: &JournalOp) {
        match op {
            JournalOp::CreateUser { id, rfid, pin, name } => {
                self.rfid_index.insert(rfid.clone(), *id);
                self.users
                    .insert(*id, User::new(*id, rfid.clone(), pin.clone(), name.clone()));
                self.bump_counter(&self.next_user_id, *id);
            }
            JournalOp::SeedLocker {
                id,
                display_number,
                location,
            } => {
                self.lockers
                    .insert(*id, Locker::new(*id, *display_number, location.clone()));
                self.bump_counter(&self.next_locker_id, *id);
            }
            JournalOp::Occupy { locker_id, user_id } => {
                if let Some(mut locker) = self.lockers.get_mut(locker_id) {
                    locker.is_occupied = true;
                    locker.occupant_id = Some(*user_id);
                    self.occupants.insert(*user_id, *locker_id);
                }
            }
            JournalOp::Vacate { locker_id } => {
                if let Some(mut locker) = self.lockers.get_mut(locker_id) {
                    if let Some(user_id) = locker.occupant_id.take() {
                        self.occupants.remove(&user_id);
                    }
                    locker.is_occupied = false;
                }
            }
        }
    }

    /// Advance an id counter past a replayed id.
    fn bump_counter(&self, counter: &AtomicU64, seen_id: u64) {
        let mut current = counter.load(Ordering::Relaxed);
        while current <= seen_id {
            match counter.compare_exchange(
                current,
                seen_id + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn locker_count(&self) -> usize {
        self.lockers.len()
    }
}

fn unavailable(err: anyhow::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

impl Storage for JournalStore {
    fn find_user_by_rfid(&self, rfid: &str) -> Result<Option<User>, StoreError> {
        let id = match self.rfid_index.get(rfid) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    fn create_user(&self, rfid: &str, pin: &str, name: &str) -> Result<User, StoreError> {
        match self.rfid_index.entry(rfid.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateCredential),
            Entry::Vacant(slot) => {
                let id = self.next_user_id.fetch_add(1, Ordering::Relaxed);

                self.journal
                    .append(JournalOp::CreateUser {
                        id,
                        rfid: rfid.to_string(),
                        pin: pin.to_string(),
                        name: name.to_string(),
                    })
                    .map_err(unavailable)?;

                let user = User::new(id, rfid.to_string(), pin.to_string(), name.to_string());
                self.users.insert(id, user.clone());
                slot.insert(id);

                Ok(user)
            }
        }
    }

    fn find_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    fn list_lockers(&self) -> Result<Vec<Locker>, StoreError> {
        let mut lockers: Vec<Locker> = self
            .lockers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        lockers.sort_by_key(|locker| locker.display_number);
        Ok(lockers)
    }

    fn find_locker(&self, id: u64) -> Result<Option<Locker>, StoreError> {
        Ok(self.lockers.get(&id).map(|entry| entry.value().clone()))
    }

    fn find_locker_by_occupant(&self, user_id: u64) -> Result<Option<Locker>, StoreError> {
        let locker_id = match self.occupants.get(&user_id) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };
        Ok(self.lockers.get(&locker_id).map(|entry| entry.value().clone()))
    }

    fn claim_locker(&self, locker_id: u64, user_id: u64) -> Result<Locker, StoreError> {
        let mut locker = self
            .lockers
            .get_mut(&locker_id)
            .ok_or(StoreError::LockerNotFound)?;

        if locker.is_occupied {
            return Err(StoreError::AlreadyOccupied);
        }

        match self.occupants.entry(user_id) {
            Entry::Occupied(_) => Err(StoreError::OccupantAssigned),
            Entry::Vacant(slot) => {
                self.journal
                    .append(JournalOp::Occupy { locker_id, user_id })
                    .map_err(unavailable)?;

                slot.insert(locker_id);
                locker.is_occupied = true;
                locker.occupant_id = Some(user_id);

                Ok(locker.clone())
            }
        }
    }

    fn release_locker(&self, locker_id: u64, user_id: u64) -> Result<Locker, StoreError> {
        let mut locker = self
            .lockers
            .get_mut(&locker_id)
            .ok_or(StoreError::LockerNotFound)?;

        if locker.occupant_id != Some(user_id) {
            return Err(StoreError::NotOccupant);
        }

        self.journal
            .append(JournalOp::Vacate { locker_id })
            .map_err(unavailable)?;

        locker.is_occupied = false;
        locker.occupant_id = None;
        self.occupants.remove(&user_id);

        Ok(locker.clone())
    }

    fn seed_lockers(&self, count: u32, per_row: u32) -> Result<usize, StoreError> {
        if !self.lockers.is_empty() {
            return Ok(0);
        }

        for n in 1..=count {
            let id = self.next_locker_id.fetch_add(1, Ordering::Relaxed);
            let row = (n + per_row - 1) / per_row;
            let col = (n - 1) % per_row + 1;
            let location = format!("Row {}, Col {}", row, col);

            self.journal
                .append(JournalOp::SeedLocker {
                    id,
                    display_number: n,
                    location: location.clone(),
                })
                .map_err(unavailable)?;

            self.lockers.insert(id, Locker::new(id, n, location));
        }

        Ok(count as usize)
    }

    fn seed_users(&self, defaults: &[SeedUser]) -> Result<usize, StoreError> {
        if !self.users.is_empty() {
            return Ok(0);
        }

        for account in defaults {
            self.create_user(&account.rfid, &account.pin, &account.name)?;
        }

        Ok(defaults.len())
    }
}
