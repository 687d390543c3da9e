//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use std::collections::HashSet;

use crate::models::Warden;

/// Validate that every warden id in a roster is unique
pub fn assert_roster_invariants(roster: &[Warden]) {
    let mut seen = HashSet::with_capacity(roster.len());
    for warden in roster {
        debug_assert!(
            seen.insert(warden.id.as_str()),
            "Duplicate warden id {} in roster",
            warden.id
        );
    }
}

/// Validate that a warden record is internally consistent
pub fn assert_warden_invariants(warden: &Warden) {
    debug_assert!(!warden.id.trim().is_empty(), "Warden has empty id");

    for room in &warden.hostel.rooms {
        debug_assert!(
            room.seats_available <= room.number_of_beds,
            "Warden {} room {} has {} seats available but only {} beds",
            warden.id,
            room.room_number,
            room.seats_available,
            room.number_of_beds
        );
    }
}
