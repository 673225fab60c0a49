//! In-process record store with versioned compare-and-set.

use super::{RecordStore, StoreError, TransactError};
use crate::config::StoreConfig;
use crate::grid::{GameId, GameRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Retry budget used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 25;

#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    record: GameRecord,
}

/// Shared in-memory store.
///
/// Each key carries a version that is bumped on every write. A transaction
/// commits only if the version it read is still current; otherwise the update
/// is re-run against the fresh record. The lock is never held while the
/// update function runs.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    cells: Arc<Mutex<HashMap<GameId, Versioned>>>,
    max_retries: u32,
}

impl InMemoryStore {
    /// Creates an empty store with the default retry budget.
    #[instrument]
    pub fn new() -> Self {
        Self::with_max_retries(DEFAULT_MAX_RETRIES)
    }

    /// Creates an empty store that retries a conflicting write at most
    /// `max_retries` times.
    #[instrument]
    pub fn with_max_retries(max_retries: u32) -> Self {
        info!(max_retries, "Creating in-memory record store");
        Self {
            cells: Arc::new(Mutex::new(HashMap::new())),
            max_retries,
        }
    }

    /// Creates an empty store from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_max_retries(*config.max_retries())
    }

    /// Retry budget of this store.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GameId, Versioned>>, StoreError> {
        self.cells
            .lock()
            .map_err(|_| StoreError::new("Record store lock poisoned"))
    }

    /// Writes `record` unconditionally, as an outside writer would.
    #[instrument(skip(self, record))]
    pub fn insert(&self, key: GameId, record: GameRecord) -> Result<(), StoreError> {
        let mut cells = self.lock()?;
        let version = cells.get(&key).map_or(0, |cell| cell.version) + 1;
        debug!(version, "Record written");
        cells.insert(key, Versioned { version, record });
        Ok(())
    }

    /// Current version of `key`; `0` when absent.
    pub fn version(&self, key: &GameId) -> Result<u64, StoreError> {
        Ok(self.lock()?.get(key).map_or(0, |cell| cell.version))
    }

    fn read(&self, key: &GameId) -> Result<(u64, Option<GameRecord>), StoreError> {
        let cells = self.lock()?;
        Ok(match cells.get(key) {
            Some(cell) => (cell.version, Some(cell.record.clone())),
            None => (0, None),
        })
    }

    fn compare_and_set(
        &self,
        key: &GameId,
        expected: u64,
        record: GameRecord,
    ) -> Result<bool, StoreError> {
        let mut cells = self.lock()?;
        let current = cells.get(key).map_or(0, |cell| cell.version);
        if current != expected {
            return Ok(false);
        }
        cells.insert(
            key.clone(),
            Versioned {
                version: expected + 1,
                record,
            },
        );
        Ok(true)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &GameId) -> Result<Option<GameRecord>, StoreError> {
        let (_, record) = self.read(key)?;
        Ok(record)
    }

    #[instrument(skip(self, update))]
    async fn transact<F, E>(
        &self,
        key: &GameId,
        update: F,
    ) -> Result<GameRecord, TransactError<E>>
    where
        F: Fn(Option<&GameRecord>) -> Result<GameRecord, E> + Send + Sync,
        E: Send,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let (version, current) = self.read(key)?;
            let next = update(current.as_ref()).map_err(TransactError::Rejected)?;

            // Let racing transactions interleave between read and write.
            tokio::task::yield_now().await;

            if self.compare_and_set(key, version, next.clone())? {
                debug!(attempts, version = version + 1, "Transaction committed");
                return Ok(next);
            }

            if attempts > self.max_retries {
                warn!(attempts, "Transaction retry budget exhausted");
                return Err(TransactError::Aborted { attempts });
            }
            debug!(attempts, "Write conflict, retrying");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GameState, Occupancy};

    fn key() -> GameId {
        GameId::new("game_1")
    }

    fn fresh() -> GameRecord {
        GameState::scheduled(Some("goose".into()), Some("duck".into())).into_record()
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = InMemoryStore::new();
        assert_eq!(store.get(&key()).await.unwrap(), None);
        assert_eq!(store.version(&key()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_transact_commits_and_bumps_version() {
        let store = InMemoryStore::new();
        store.insert(key(), fresh()).unwrap();

        let written = store
            .transact(&key(), |current| {
                let mut record = current.cloned().ok_or("missing")?;
                record.history.push(Occupancy::new(0b1));
                Ok::<_, &str>(record)
            })
            .await
            .unwrap();

        assert_eq!(written.history.len(), 2);
        assert_eq!(store.get(&key()).await.unwrap(), Some(written));
        assert_eq!(store.version(&key()).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejection_writes_nothing() {
        let store = InMemoryStore::new();
        store.insert(key(), fresh()).unwrap();

        let result = store
            .transact(&key(), |_| Err::<GameRecord, _>("nope"))
            .await;

        assert!(matches!(result, Err(TransactError::Rejected("nope"))));
        assert_eq!(store.version(&key()).unwrap(), 1);
        assert_eq!(store.get(&key()).await.unwrap(), Some(fresh()));
    }

    #[tokio::test]
    async fn test_conflict_reruns_update_against_fresh_value() {
        let store = InMemoryStore::new();
        store.insert(key(), fresh()).unwrap();

        let calls = std::sync::atomic::AtomicU32::new(0);
        let result = store
            .transact(&key(), |current| {
                let call = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                let mut record = current.cloned().ok_or("missing")?;
                if call == 0 {
                    // An outside writer lands between our read and write.
                    let mut foreign = record.clone();
                    foreign.history.push(Occupancy::new(0b100));
                    store.insert(key(), foreign).map_err(|_| "store")?;
                }
                let last = *record.history.last().ok_or("empty")?;
                record.history.push(last | Occupancy::new(0b1));
                Ok::<_, &str>(record)
            })
            .await
            .unwrap();

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(
            result.history,
            vec![Occupancy::EMPTY, Occupancy::new(0b100), Occupancy::new(0b101)]
        );
    }

    #[tokio::test]
    async fn test_persistent_conflict_aborts() {
        let store = InMemoryStore::with_max_retries(3);
        store.insert(key(), fresh()).unwrap();

        let result = store
            .transact(&key(), |current| {
                let record = current.cloned().ok_or("missing")?;
                store.insert(key(), record.clone()).map_err(|_| "store")?;
                Ok::<_, &str>(record)
            })
            .await;

        assert!(matches!(result, Err(TransactError::Aborted { attempts: 4 })));
    }
}
