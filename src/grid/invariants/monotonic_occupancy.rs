//! Monotonic occupancy invariant: cells never empty once claimed.

use super::super::Occupancy;
use super::Invariant;

/// Invariant: Each snapshot strictly grows the previous one.
///
/// Every move claims at least one new cell and never releases a cell, which
/// is what lets the history double as a time-travel log.
pub struct MonotonicOccupancyInvariant;

impl Invariant<[Occupancy]> for MonotonicOccupancyInvariant {
    fn holds(history: &[Occupancy]) -> bool {
        history
            .windows(2)
            .all(|pair| pair[1].is_strict_superset_of(pair[0]))
    }

    fn description() -> &'static str {
        "Snapshots strictly grow (cells are never released)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growing_history_holds() {
        let history = [0b000, 0b001, 0b011].map(Occupancy::new);
        assert!(MonotonicOccupancyInvariant::holds(&history));
    }

    #[test]
    fn test_released_cell_violates() {
        let history = [0b000, 0b011, 0b010].map(Occupancy::new);
        assert!(!MonotonicOccupancyInvariant::holds(&history));
    }

    #[test]
    fn test_repeated_snapshot_violates() {
        let history = [0b000, 0b001, 0b001].map(Occupancy::new);
        assert!(!MonotonicOccupancyInvariant::holds(&history));
    }
}
