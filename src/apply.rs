//! Transactional move application.
//!
//! Wraps the pure [`apply_move`] in a store transaction so that concurrent
//! submissions against the same game are serialised by the store's
//! compare-and-set. Validation failures are never retried: the update is
//! deterministic, so re-running it against the same record gives the same
//! rejection.

use crate::grid::{GameId, GameRecord, GameState, MoveError, MoveRules, Occupancy, PlayerId, apply_move};
use crate::store::{RecordStore, StoreError, TransactError};
use derive_more::{Display, Error, From};
use tracing::{error, info, instrument, warn};

/// Why a submission did not land.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ApplyError {
    /// The move was invalid against the record it was checked against.
    #[display("Move rejected: {_0}")]
    Rejected(MoveError),

    /// Sustained write contention exhausted the store's retry budget.
    #[display("Transaction aborted after {attempts} attempts")]
    #[from(ignore)]
    Aborted {
        /// Number of times the update ran.
        attempts: u32,
    },

    /// The store failed independently of the move.
    #[display("{_0}")]
    Store(StoreError),
}

impl From<TransactError<MoveError>> for ApplyError {
    fn from(err: TransactError<MoveError>) -> Self {
        match err {
            TransactError::Rejected(reason) => Self::Rejected(reason),
            TransactError::Aborted { attempts } => Self::Aborted { attempts },
            TransactError::Backend(err) => Self::Store(err),
        }
    }
}

/// Applies moves to game records held in a [`RecordStore`].
#[derive(Debug, Clone)]
pub struct MoveApplier<S> {
    store: S,
    rules: MoveRules,
}

impl<S: RecordStore> MoveApplier<S> {
    /// Creates an applier over `store` using `rules` for move shapes.
    pub fn new(store: S, rules: MoveRules) -> Self {
        Self { store, rules }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the move rules.
    pub fn rules(&self) -> &MoveRules {
        &self.rules
    }

    /// Applies `cells` for `player` to the game stored under `game_id`.
    ///
    /// Reads the record, runs the transition and writes the result back in
    /// one optimistic transaction. A concurrent write to the same game makes
    /// the store re-run the transition against the fresh record. Failures are
    /// logged here and returned; none of them are retried by this call.
    #[instrument(skip_all, fields(game = %game_id, player = %player, cells = %cells))]
    pub async fn apply(
        &self,
        game_id: &GameId,
        player: &PlayerId,
        cells: Occupancy,
    ) -> Result<GameState, ApplyError> {
        let rules = &self.rules;
        let update = |current: Option<&GameRecord>| -> Result<GameRecord, MoveError> {
            let record = current
                .cloned()
                .ok_or_else(|| MoveError::MalformedState("No record for game".to_string()))?;
            let state = GameState::try_from(record)?;
            apply_move(&state, player, cells, rules).map(GameState::into_record)
        };

        match self.store.transact(game_id, update).await {
            Ok(record) => {
                let state = GameState::try_from(record)?;
                info!(moves_played = state.moves_played(), "Move executed");
                Ok(state)
            }
            Err(err) => {
                let err = ApplyError::from(err);
                match &err {
                    ApplyError::Store(_) => {
                        error!(error = %err, "Failed to execute move");
                    }
                    _ => {
                        warn!(error = %err, "Failed to execute move");
                    }
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn seeded() -> (GameId, MoveApplier<InMemoryStore>) {
        let store = InMemoryStore::new();
        let game = GameId::new("game_1");
        store
            .insert(
                game.clone(),
                GameState::scheduled(Some("goose".into()), Some("duck".into())).into_record(),
            )
            .unwrap();
        (game, MoveApplier::new(store, MoveRules::meta_board()))
    }

    #[tokio::test]
    async fn test_apply_persists_move() {
        let (game, applier) = seeded();
        let state = applier
            .apply(&game, &"goose".into(), Occupancy::new(0b001))
            .await
            .unwrap();

        let stored = applier.store().get(&game).await.unwrap().unwrap();
        assert_eq!(stored, state.into_record());
        assert_eq!(stored.history, vec![Occupancy::EMPTY, Occupancy::new(0b001)]);
    }

    #[tokio::test]
    async fn test_rejection_keeps_reason_and_record() {
        let (game, applier) = seeded();
        let result = applier
            .apply(&game, &"duck".into(), Occupancy::new(0b001))
            .await;

        assert!(matches!(
            result,
            Err(ApplyError::Rejected(MoveError::WrongTurn { .. }))
        ));
        assert_eq!(applier.store().version(&game).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_game_is_malformed() {
        let (_, applier) = seeded();
        let result = applier
            .apply(&GameId::new("nope"), &"goose".into(), Occupancy::new(0b1))
            .await;

        assert!(matches!(
            result,
            Err(ApplyError::Rejected(MoveError::MalformedState(_)))
        ));
        assert_eq!(applier.store().get(&GameId::new("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_repeat_after_success_is_rejected() {
        let (game, applier) = seeded();
        applier
            .apply(&game, &"goose".into(), Occupancy::new(0b1))
            .await
            .unwrap();
        let again = applier
            .apply(&game, &"goose".into(), Occupancy::new(0b1))
            .await;
        assert!(matches!(
            again,
            Err(ApplyError::Rejected(MoveError::WrongTurn { .. }))
        ));
    }
}
