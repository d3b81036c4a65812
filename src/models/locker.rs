use serde::{Deserialize, Serialize};

/// A physical storage locker.
///
/// The full locker set is created once at seed time; only the occupancy
/// fields mutate afterwards. `is_occupied` is true exactly when
/// `occupant_id` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locker {
    /// Generated locker ID
    pub id: u64,
    /// Unique positive number shown to members; stable post-seed
    pub display_number: u32,
    /// Whether the locker is currently held
    pub is_occupied: bool,
    /// The holding user, if any
    pub occupant_id: Option<u64>,
    /// Descriptive position, e.g. "Row 1, Col 3"
    pub location: String,
}

impl Locker {
    /// Create a free locker.
    pub fn new(id: u64, display_number: u32, location: String) -> Self {
        Self {
            id,
            display_number,
            is_occupied: false,
            occupant_id: None,
            location,
        }
    }
}
