//! The pure move transition function.

use super::action::{MoveError, ProposedMove};
use super::contracts::{Contract, MoveContract};
use super::rules::MoveRules;
use super::state::GameState;
use super::{Occupancy, PlayerId};
use tracing::{debug, instrument};

/// Applies `cells` for `player` to `state`, returning the next state.
///
/// Never mutates `state`. Rejections are checked in order: wrong turn,
/// illegal shape, occupied cell. On success the new snapshot is the union
/// of the move and the current board.
#[instrument(skip(state, rules), fields(moves_played = state.moves_played()))]
pub fn apply_move(
    state: &GameState,
    player: &PlayerId,
    cells: Occupancy,
    rules: &MoveRules,
) -> Result<GameState, MoveError> {
    let contract = MoveContract::new(rules);
    let action = ProposedMove::new(player.clone(), cells);

    contract.pre(state, &action)?;

    let next_board = cells | state.current_occupancy()?;
    let next = state.with_move_applied(next_board);

    #[cfg(debug_assertions)]
    contract.post(state, &next)?;

    debug!(board = %next_board, "Move applied");
    Ok(next)
}
