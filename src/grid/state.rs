//! Game state and its persisted record.
//!
//! [`GameRecord`] is the shape stored under each game key. [`GameState`] is
//! the validated value the transition function works on; the only way to
//! obtain one from stored data is the fallible [`TryFrom<GameRecord>`] parse.

use super::action::MoveError;
use super::invariants::check_history;
use super::{Occupancy, PlayerId, Role};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Persisted game record, one per game key.
///
/// Empty seats are stored as `null`. `history[0]` is the empty board and
/// every later entry is the board after that many moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Player 1's display name.
    pub player1: Option<PlayerId>,
    /// Player 2's display name.
    pub player2: Option<PlayerId>,
    /// Occupancy snapshots in move order.
    pub history: Vec<Occupancy>,
}

impl GameRecord {
    /// Parses a record from its JSON form.
    #[instrument(skip(json))]
    pub fn from_json(json: &str) -> Result<Self, MoveError> {
        serde_json::from_str(json).map_err(|e| {
            warn!(error = %e, "Failed to decode game record");
            MoveError::MalformedState(format!("Undecodable record: {}", e))
        })
    }

    /// Encodes the record as JSON.
    pub fn to_json(&self) -> Result<String, MoveError> {
        serde_json::to_string(self)
            .map_err(|e| MoveError::MalformedState(format!("Unencodable record: {}", e)))
    }
}

/// Validated state of one game.
///
/// Invariants enforced at construction:
/// - history is never empty
/// - history starts from the empty board
/// - each snapshot strictly grows the previous one
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameState {
    player1: Option<PlayerId>,
    player2: Option<PlayerId>,
    history: Vec<Occupancy>,
}

impl GameState {
    /// Creates a freshly scheduled game with an empty board.
    #[instrument]
    pub fn scheduled(player1: Option<PlayerId>, player2: Option<PlayerId>) -> Self {
        Self {
            player1,
            player2,
            history: vec![Occupancy::EMPTY],
        }
    }

    /// Seat whose turn it is, derived from history parity.
    ///
    /// The empty-board snapshot is not a move, so player 1 moves whenever
    /// the number of snapshots after it is even.
    pub fn turn_parity(&self) -> Role {
        Role::for_moves_played(self.moves_played())
    }

    /// The board after the latest move.
    pub fn current_occupancy(&self) -> Result<Occupancy, MoveError> {
        self.history
            .last()
            .copied()
            .ok_or_else(|| MoveError::MalformedState("History is empty".to_string()))
    }

    /// Returns a copy with `next_occupancy` appended to the history.
    ///
    /// Legality is not checked here; see [`apply_move`](super::apply_move).
    pub fn with_move_applied(&self, next_occupancy: Occupancy) -> Self {
        let mut next = self.clone();
        next.history.push(next_occupancy);
        next
    }

    /// Player seated in `role`, if the seat is filled.
    pub fn player(&self, role: Role) -> Option<&PlayerId> {
        match role {
            Role::First => self.player1.as_ref(),
            Role::Second => self.player2.as_ref(),
        }
    }

    /// Player expected to move next. `None` while waiting for an opponent.
    pub fn expected_player(&self) -> Option<&PlayerId> {
        self.player(self.turn_parity())
    }

    /// Number of moves applied so far.
    pub fn moves_played(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    /// Board as it stood after `ply` moves (`0` is the empty board).
    pub fn snapshot_at(&self, ply: usize) -> Option<Occupancy> {
        self.history.get(ply).copied()
    }

    /// Cells claimed by move number `ply` (1-based).
    pub fn move_at(&self, ply: usize) -> Option<Occupancy> {
        let before = self.history.get(ply.checked_sub(1)?)?;
        let after = self.history.get(ply)?;
        Some(*after ^ *before)
    }

    /// Replays the game one move at a time.
    pub fn replay(&self) -> impl Iterator<Item = Replayed> + '_ {
        self.history.windows(2).enumerate().map(|(index, pair)| Replayed {
            ply: index + 1,
            role: Role::for_moves_played(index),
            cells: pair[1] ^ pair[0],
            board: pair[1],
        })
    }

    /// Converts back to the persisted shape.
    pub fn as_record(&self) -> GameRecord {
        self.clone().into_record()
    }

    /// Converts into the persisted shape.
    pub fn into_record(self) -> GameRecord {
        GameRecord {
            player1: self.player1,
            player2: self.player2,
            history: self.history,
        }
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = MoveError;

    #[instrument(skip(record), fields(len = record.history.len()))]
    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if let Err(violations) = check_history(&record.history) {
            warn!(violations = %violations, "Rejected malformed game record");
            return Err(MoveError::MalformedState(violations));
        }
        debug!("Game record validated");
        Ok(Self {
            player1: record.player1,
            player2: record.player2,
            history: record.history,
        })
    }
}

impl From<GameState> for GameRecord {
    fn from(state: GameState) -> Self {
        state.into_record()
    }
}

/// One step of a replayed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replayed {
    /// Move number, starting at 1.
    pub ply: usize,
    /// Seat that made the move.
    pub role: Role,
    /// Cells claimed by the move.
    pub cells: Occupancy,
    /// Board after the move.
    pub board: Occupancy,
}
