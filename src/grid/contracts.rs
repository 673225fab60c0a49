//! Contract-based validation for grid moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P(state, move)} apply {Q(before, after)}. Preconditions are checked in a
//! fixed order so that a move failing several of them always reports the
//! same reason.

use super::action::{MoveError, ProposedMove};
use super::invariants::check_history;
use super::rules::MoveRules;
use super::state::GameState;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(&self, state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(&self, before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: The acting player holds the seat whose turn it is.
///
/// An unfilled seat never matches, so nobody can move for a missing opponent.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the acting player against the turn parity.
    #[instrument(skip(game))]
    pub fn check(mov: &ProposedMove, game: &GameState) -> Result<(), MoveError> {
        let expected = game.turn_parity();
        if game.player(expected) != Some(&mov.player) {
            Err(MoveError::WrongTurn {
                player: mov.player.clone(),
                expected,
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: The move is a single cell from the seat's universe.
pub struct LegalShape;

impl LegalShape {
    /// Checks the move shape for the seat whose turn it is.
    #[instrument(skip(game, rules))]
    pub fn check(
        mov: &ProposedMove,
        game: &GameState,
        rules: &MoveRules,
    ) -> Result<(), MoveError> {
        let role = game.turn_parity();
        if !rules.is_legal_move_shape(mov.cells, role) {
            Err(MoveError::InvalidMove {
                cells: mov.cells,
                role,
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: None of the move's cells are occupied.
pub struct CellsVacant;

impl CellsVacant {
    /// Checks the move against the latest snapshot.
    #[instrument(skip(game))]
    pub fn check(mov: &ProposedMove, game: &GameState) -> Result<(), MoveError> {
        let board = game.current_occupancy()?;
        if mov.cells.overlaps(board) {
            Err(MoveError::CellOccupied {
                cells: mov.cells,
                taken: mov.cells & board,
            })
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move submissions.
///
/// Preconditions, in order:
/// - It is the player's turn
/// - The move has a legal shape
/// - The claimed cells are vacant
///
/// Postconditions:
/// - History invariants still hold
/// - History grew by exactly one snapshot
pub struct MoveContract<'a> {
    rules: &'a MoveRules,
}

impl<'a> MoveContract<'a> {
    /// Creates a contract bound to the given rules.
    pub fn new(rules: &'a MoveRules) -> Self {
        Self { rules }
    }
}

impl Contract<GameState, ProposedMove> for MoveContract<'_> {
    fn pre(&self, game: &GameState, action: &ProposedMove) -> Result<(), MoveError> {
        PlayersTurn::check(action, game)?;
        LegalShape::check(action, game, self.rules)?;
        CellsVacant::check(action, game)?;
        Ok(())
    }

    fn post(&self, before: &GameState, after: &GameState) -> Result<(), MoveError> {
        check_history(after.history()).map_err(|descriptions| {
            warn!(descriptions = %descriptions, "Postcondition failed");
            MoveError::MalformedState(format!("Postcondition failed: {}", descriptions))
        })?;

        if after.history().len() != before.history().len() + 1 {
            return Err(MoveError::MalformedState(
                "Postcondition failed: history must grow by one snapshot".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GameRecord, Occupancy, PlayerId};

    fn fresh() -> GameState {
        GameState::scheduled(Some("goose".into()), Some("duck".into()))
    }

    fn mov(player: &str, cells: u128) -> ProposedMove {
        ProposedMove::new(PlayerId::new(player), Occupancy::new(cells))
    }

    #[test]
    fn test_precondition_passes_for_legal_move() {
        let rules = MoveRules::meta_board();
        assert!(MoveContract::new(&rules).pre(&fresh(), &mov("goose", 0b1)).is_ok());
    }

    #[test]
    fn test_precondition_wrong_turn() {
        let rules = MoveRules::meta_board();
        assert!(matches!(
            MoveContract::new(&rules).pre(&fresh(), &mov("duck", 0b1)),
            Err(MoveError::WrongTurn { .. })
        ));
    }

    #[test]
    fn test_wrong_turn_checked_before_shape() {
        let rules = MoveRules::meta_board();
        assert!(matches!(
            MoveContract::new(&rules).pre(&fresh(), &mov("duck", 0b11)),
            Err(MoveError::WrongTurn { .. })
        ));
    }

    #[test]
    fn test_shape_checked_before_occupancy() {
        let rules = MoveRules::meta_board();
        let game = GameState::try_from(GameRecord {
            player1: Some("goose".into()),
            player2: Some("duck".into()),
            history: vec![Occupancy::EMPTY, Occupancy::new(0b01)],
        })
        .unwrap();
        assert!(matches!(
            MoveContract::new(&rules).pre(&game, &mov("duck", 0b11)),
            Err(MoveError::InvalidMove { .. })
        ));
        assert_eq!(
            MoveContract::new(&rules).pre(&game, &mov("duck", 0b01)),
            Err(MoveError::CellOccupied {
                cells: Occupancy::new(0b01),
                taken: Occupancy::new(0b01),
            })
        );
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let rules = MoveRules::meta_board();
        let before = fresh();
        let after = before.with_move_applied(Occupancy::EMPTY);
        assert!(MoveContract::new(&rules).post(&before, &after).is_err());
    }
}
