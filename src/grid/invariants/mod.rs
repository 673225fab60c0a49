//! First-class invariants for grid histories.
//!
//! Invariants are logical properties that every stored history must satisfy.
//! They are checked when a record is parsed into a
//! [`GameState`](super::GameState) and again after each transition in debug
//! builds.

mod empty_origin;
mod monotonic_occupancy;
mod non_empty_history;

pub use empty_origin::EmptyOriginInvariant;
pub use monotonic_occupancy::MonotonicOccupancyInvariant;
pub use non_empty_history::NonEmptyHistoryInvariant;

use super::Occupancy;

/// A logical property that must hold for a given state.
pub trait Invariant<S: ?Sized> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples.
pub trait InvariantSet<S: ?Sized> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    S: ?Sized,
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// All history invariants as a composable set.
pub type GridInvariants = (
    NonEmptyHistoryInvariant,
    EmptyOriginInvariant,
    MonotonicOccupancyInvariant,
);

/// Checks [`GridInvariants`] and joins any violations into one message.
pub fn check_history(history: &[Occupancy]) -> Result<(), String> {
    GridInvariants::check_all(history).map_err(|violations| {
        violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_set_holds_for_fresh_history() {
        assert!(GridInvariants::check_all(&[Occupancy::EMPTY][..]).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let history = [0b0, 0b001, 0b011, 0b111].map(Occupancy::new);
        assert!(GridInvariants::check_all(&history[..]).is_ok());
    }

    #[test]
    fn test_invariant_set_collects_every_violation() {
        let history = [0b010, 0b001].map(Occupancy::new);
        let violations = GridInvariants::check_all(&history[..]).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_check_history_joins_descriptions() {
        let message = check_history(&[]).unwrap_err();
        assert!(message.contains("at least one snapshot"));
        assert!(message.contains("empty board"));
    }
}
