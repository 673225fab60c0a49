//! Atomic record store seam.
//!
//! The engine never locks game records itself. All mutual exclusion between
//! concurrent submissions is delegated to [`RecordStore::transact`], which
//! gives single-key read-modify-write atomicity with optimistic retries.

mod error;
mod memory;

pub use error::{StoreError, TransactError};
pub use memory::{DEFAULT_MAX_RETRIES, InMemoryStore};

use crate::grid::{GameId, GameRecord};
use async_trait::async_trait;

/// Key-value store of game records with optimistic transactions.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads the current record for `key`, if any.
    async fn get(&self, key: &GameId) -> Result<Option<GameRecord>, StoreError>;

    /// Runs `update` against the current value of `key` and writes its result.
    ///
    /// If the value changed between the read and the write, `update` is run
    /// again against the fresh value until the store's retry budget runs out.
    /// `update` may therefore run several times and must be free of side
    /// effects. Returning `Err` aborts the transaction without writing.
    async fn transact<F, E>(
        &self,
        key: &GameId,
        update: F,
    ) -> Result<GameRecord, TransactError<E>>
    where
        F: Fn(Option<&GameRecord>) -> Result<GameRecord, E> + Send + Sync,
        E: Send;
}
