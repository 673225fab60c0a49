//! Non-empty history invariant: the initial snapshot is always present.

use super::super::Occupancy;
use super::Invariant;

/// Invariant: History holds at least one snapshot.
pub struct NonEmptyHistoryInvariant;

impl Invariant<[Occupancy]> for NonEmptyHistoryInvariant {
    fn holds(history: &[Occupancy]) -> bool {
        !history.is_empty()
    }

    fn description() -> &'static str {
        "History holds at least one snapshot"
    }
}
