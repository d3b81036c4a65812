use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::core::config::Config;
use crate::storage::{JournalStore, Storage};

/// Open the journal-backed store and seed it.
///
/// Seeding only runs against empty tables, so a restart replays the journal
/// and leaves existing state untouched.
pub fn initialize_store(config: &Config) -> Result<Arc<JournalStore>> {
    let store = JournalStore::open(&config.storage.journal_path).context(format!(
        "Failed to open locker store at '{}'",
        config.storage.journal_path.display()
    ))?;

    let lockers_created = store
        .seed_lockers(config.seed.locker_count, config.seed.lockers_per_row)
        .context("Failed to seed lockers")?;

    if lockers_created > 0 {
        info!(lockers_created, "Locker table seeded");
    } else {
        info!(lockers = store.locker_count(), "Locker table already populated");
    }

    let users_created = store
        .seed_users(&config.seed.users)
        .context("Failed to seed default users")?;

    if users_created > 0 {
        info!(users_created, "Default accounts seeded");
    } else {
        info!(users = store.user_count(), "User table already populated");
    }

    Ok(Arc::new(store))
}
