use std::collections::HashSet;

use crate::models::bed_bookings::{
    BED_STATUS_AVAILABLE, BED_STATUS_MAINTENANCE, BED_STATUS_OCCUPIED, BED_STATUS_RESERVED,
};

/// Maps a staff-supplied status onto the stored spelling. The legacy API
/// spelling "Maintainance" is still accepted.
pub fn parse_bed_status(status: &str) -> Option<&'static str> {
    match status {
        BED_STATUS_OCCUPIED => Some(BED_STATUS_OCCUPIED),
        BED_STATUS_AVAILABLE => Some(BED_STATUS_AVAILABLE),
        BED_STATUS_RESERVED => Some(BED_STATUS_RESERVED),
        BED_STATUS_MAINTENANCE | "Maintainance" => Some(BED_STATUS_MAINTENANCE),
        _ => None,
    }
}

/// Lowest bed number in `1..=max_beds` absent from `held`.
pub fn lowest_free_bed(held: &[i32], max_beds: i32) -> Option<i32> {
    let held: HashSet<i32> = held.iter().copied().collect();
    (1..=max_beds).find(|n| !held.contains(n))
}
