use crate::storage::{Storage, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub logins: AtomicU64,
    pub occupies: AtomicU64,
    pub vacates: AtomicU64,
    pub opens: AtomicU64,
    pub failed_requests: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub logins: u64,
    pub occupies: u64,
    pub vacates: u64,
    pub opens: u64,
    pub failed_requests: u64,
    pub total_lockers: usize,
    pub occupied_lockers: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        let start_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        Self {
            logins: AtomicU64::new(0),
            occupies: AtomicU64::new(0),
            vacates: AtomicU64::new(0),
            opens: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            start_time,
        }
    }

    pub fn increment_logins(&self) {
        self.logins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_occupies(&self) {
        self.occupies.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_vacates(&self) {
        self.vacates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_opens(&self) {
        self.opens.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Combine the counters with current locker occupancy from the store.
    pub fn get_snapshot(&self, store: &dyn Storage) -> Result<MetricsSnapshot, StoreError> {
        let current_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;

        let lockers = store.list_lockers()?;
        let occupied_lockers = lockers.iter().filter(|l| l.is_occupied).count();

        Ok(MetricsSnapshot {
            logins: self.logins.load(Ordering::Relaxed),
            occupies: self.occupies.load(Ordering::Relaxed),
            vacates: self.vacates.load(Ordering::Relaxed),
            opens: self.opens.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_lockers: lockers.len(),
            occupied_lockers,
            uptime_seconds: current_time - self.start_time,
        })
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
