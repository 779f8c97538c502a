//! In-process snapshot store used for ephemeral runs and tests.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::BoxFuture;

use crate::dao::{
    game_store::GameStore,
    models::GameSnapshotEntity,
    storage::{StorageError, StorageResult},
};

/// Keeps the serialized snapshot in memory, exactly as a file would hold it.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

#[derive(Debug, thiserror::Error)]
#[error("memory store lock poisoned")]
struct PoisonedSlot;

impl MemoryGameStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw bytes, which need not be valid JSON.
    pub fn with_raw(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Raw bytes currently held, if any.
    pub fn raw(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Option<Vec<u8>>>> {
        self.slot
            .lock()
            .map_err(|_| StorageError::unavailable(PoisonedSlot.to_string(), PoisonedSlot))
    }

    fn save(&self, snapshot: &GameSnapshotEntity) -> StorageResult<()> {
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|err| StorageError::unavailable("failed to encode snapshot".into(), err))?;
        *self.lock()? = Some(bytes);
        Ok(())
    }

    fn load(&self) -> StorageResult<Option<GameSnapshotEntity>> {
        let guard = self.lock()?;
        let Some(bytes) = guard.as_deref() else {
            return Ok(None);
        };
        serde_json::from_slice(bytes)
            .map(Some)
            .map_err(|err| StorageError::malformed("failed to decode snapshot".into(), err))
    }
}

impl GameStore for MemoryGameStore {
    fn save_snapshot(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.save(&snapshot);
        Box::pin(async move { result })
    }

    fn load_snapshot(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>> {
        let result = self.load();
        Box::pin(async move { result })
    }

    fn clear_snapshot(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.lock().map(|mut slot| {
            slot.take();
        });
        Box::pin(async move { result })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.lock().map(|_| ());
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> GameSnapshotEntity {
        GameSnapshotEntity {
            players: Vec::new(),
            target_score: 250,
            current_round: 1,
            game_started: true,
            game_ended: false,
            winner: None,
        }
    }

    #[tokio::test]
    async fn keeps_the_last_saved_snapshot() {
        let store = MemoryGameStore::new();
        assert!(store.load_snapshot().await.unwrap().is_none());

        store.save_snapshot(snapshot()).await.unwrap();
        assert_eq!(store.load_snapshot().await.unwrap(), Some(snapshot()));

        store.clear_snapshot().await.unwrap();
        assert!(store.raw().unwrap().is_none());
    }

    #[tokio::test]
    async fn undecodable_bytes_are_malformed() {
        let store = MemoryGameStore::with_raw("[1, 2");
        let err = store.load_snapshot().await.unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }
}
