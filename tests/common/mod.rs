//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;
use strictly_meta::{
    GameId, GameRecord, GameState, InMemoryStore, RecordStore, StoreError, TransactError,
};
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeds `game` with a fresh goose-vs-duck record.
pub fn schedule_goose_vs_duck(store: &InMemoryStore, game: &str) {
    store
        .insert(
            GameId::new(game),
            GameState::scheduled(Some("goose".into()), Some("duck".into())).into_record(),
        )
        .expect("Failed to seed game");
}

/// Store wrapper recording the key of every transaction, in call order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: InMemoryStore,
    pub transactions: Mutex<Vec<GameId>>,
}

impl RecordingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            transactions: Mutex::new(Vec::new()),
        }
    }

    pub fn transacted_keys(&self) -> Vec<String> {
        self.transactions
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|key| key.as_str().to_string())
            .collect()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn get(&self, key: &GameId) -> Result<Option<GameRecord>, StoreError> {
        self.inner.get(key).await
    }

    async fn transact<F, E>(
        &self,
        key: &GameId,
        update: F,
    ) -> Result<GameRecord, TransactError<E>>
    where
        F: Fn(Option<&GameRecord>) -> Result<GameRecord, E> + Send + Sync,
        E: Send,
    {
        self.transactions
            .lock()
            .expect("lock poisoned")
            .push(key.clone());
        self.inner.transact(key, update).await
    }
}

/// Store wrapper where another writer touches the record during every
/// attempt, so no transaction can ever commit.
#[derive(Debug, Default)]
pub struct ContendedStore {
    pub inner: InMemoryStore,
}

#[async_trait]
impl RecordStore for ContendedStore {
    async fn get(&self, key: &GameId) -> Result<Option<GameRecord>, StoreError> {
        self.inner.get(key).await
    }

    async fn transact<F, E>(
        &self,
        key: &GameId,
        update: F,
    ) -> Result<GameRecord, TransactError<E>>
    where
        F: Fn(Option<&GameRecord>) -> Result<GameRecord, E> + Send + Sync,
        E: Send,
    {
        let inner = &self.inner;
        self.inner
            .transact(key, |current| {
                if let Some(record) = current {
                    inner
                        .insert(key.clone(), record.clone())
                        .expect("Failed to interfere");
                }
                update(current)
            })
            .await
    }
}
