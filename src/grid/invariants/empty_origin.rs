//! Empty origin invariant: every game starts from a blank board.

use super::super::Occupancy;
use super::Invariant;

/// Invariant: The first snapshot is the empty board.
///
/// An empty history also fails this check, so the set reports both
/// violations for a record with no snapshots.
pub struct EmptyOriginInvariant;

impl Invariant<[Occupancy]> for EmptyOriginInvariant {
    fn holds(history: &[Occupancy]) -> bool {
        history.first().is_some_and(|origin| origin.is_empty())
    }

    fn description() -> &'static str {
        "History starts from the empty board"
    }
}
