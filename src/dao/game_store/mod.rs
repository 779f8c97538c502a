#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

use crate::dao::models::GameSnapshotEntity;
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the place where the single game snapshot is mirrored.
pub trait GameStore: Send + Sync {
    fn save_snapshot(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn load_snapshot(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>>;
    fn clear_snapshot(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
