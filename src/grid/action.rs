//! First-class move submissions.
//!
//! A submission pairs the acting player with the cells they want to claim.
//! It is validated against a [`GameState`](super::GameState) before it is
//! folded into the history.

use super::{Occupancy, PlayerId, Role};
use serde::{Deserialize, Serialize};

/// A player's attempt to claim cells on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposedMove {
    /// The player submitting the move.
    pub player: PlayerId,
    /// Cells the player wants to occupy.
    pub cells: Occupancy,
}

impl ProposedMove {
    /// Creates a new proposed move.
    pub fn new(player: PlayerId, cells: Occupancy) -> Self {
        Self { player, cells }
    }
}

impl std::fmt::Display for ProposedMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.cells)
    }
}

/// Reason a move was not applied.
///
/// Every variant is terminal for the submission: re-running the same move
/// against the same state yields the same rejection.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The acting player does not hold the seat whose turn it is.
    #[display("Not {player}'s turn (waiting on {expected})")]
    WrongTurn {
        /// Player that attempted the move.
        player: PlayerId,
        /// Seat whose turn it is.
        expected: Role,
    },

    /// The move is not a single cell from the seat's legal universe.
    #[display("Not a move ({cells}) for {role}")]
    InvalidMove {
        /// Submitted cells.
        cells: Occupancy,
        /// Seat the move was checked against.
        role: Role,
    },

    /// The move claims at least one occupied cell.
    #[display("Move already played ({cells})")]
    CellOccupied {
        /// Submitted cells.
        cells: Occupancy,
        /// Overlap with the current board.
        taken: Occupancy,
    },

    /// The stored record breaks the shape invariants of a game.
    #[display("Malformed game state: {_0}")]
    MalformedState(#[error(not(source))] String),
}
