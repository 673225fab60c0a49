//! Meta tic-tac-toe grid: state model, legality rules and the pure
//! transition function.

mod action;
mod contracts;
mod invariants;
mod rules;
mod state;
mod transition;
mod types;

pub use action::{MoveError, ProposedMove};
pub use contracts::{CellsVacant, Contract, LegalShape, MoveContract, PlayersTurn};
pub use invariants::{
    EmptyOriginInvariant, GridInvariants, Invariant, InvariantSet, InvariantViolation,
    MonotonicOccupancyInvariant, NonEmptyHistoryInvariant, check_history,
};
pub use rules::MoveRules;
pub use state::{GameRecord, GameState, Replayed};
pub use transition::apply_move;
pub use types::{
    CELLS_PER_SUB_BOARD, GameId, META_CELLS, Occupancy, PlayerId, Role, SUB_BOARDS, UserId,
};
