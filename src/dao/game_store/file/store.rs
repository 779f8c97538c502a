use std::{io::ErrorKind, sync::Arc};

use futures::future::BoxFuture;
use tokio::fs;
use tracing::debug;

use crate::dao::{game_store::GameStore, models::GameSnapshotEntity, storage::StorageResult};

use super::{
    config::FileStoreConfig,
    error::{FileDaoError, FileResult},
};

/// Snapshot store writing pretty JSON to a single file on disk.
#[derive(Clone)]
pub struct FileGameStore {
    config: Arc<FileStoreConfig>,
}

impl FileGameStore {
    /// Prepare the store, creating the snapshot directory when missing.
    pub async fn open(config: FileStoreConfig) -> FileResult<Self> {
        let store = Self {
            config: Arc::new(config),
        };
        store.ensure_directory().await?;
        Ok(store)
    }

    async fn ensure_directory(&self) -> FileResult<()> {
        if let Some(dir) = self.config.directory() {
            fs::create_dir_all(dir)
                .await
                .map_err(|source| FileDaoError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }
        Ok(())
    }

    async fn write(&self, snapshot: &GameSnapshotEntity) -> FileResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|source| FileDaoError::Encode { source })?;
        let staging = self.config.staging_path();

        fs::write(&staging, bytes)
            .await
            .map_err(|source| FileDaoError::Write {
                path: staging.clone(),
                source,
            })?;
        fs::rename(&staging, &self.config.path)
            .await
            .map_err(|source| FileDaoError::Rename {
                path: self.config.path.clone(),
                source,
            })?;

        debug!(path = %self.config.path.display(), "snapshot written");
        Ok(())
    }

    async fn read(&self) -> FileResult<Option<GameSnapshotEntity>> {
        let bytes = match fs::read(&self.config.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(FileDaoError::Read {
                    path: self.config.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| FileDaoError::Decode {
                path: self.config.path.clone(),
                source,
            })
    }

    async fn remove(&self) -> FileResult<()> {
        match fs::remove_file(&self.config.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileDaoError::Remove {
                path: self.config.path.clone(),
                source,
            }),
        }
    }

    async fn check(&self) -> FileResult<()> {
        self.ensure_directory().await?;
        match fs::metadata(&self.config.path).await {
            Ok(meta) if !meta.is_file() => Err(FileDaoError::NotAFile {
                path: self.config.path.clone(),
            }),
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileDaoError::Read {
                path: self.config.path.clone(),
                source,
            }),
        }
    }
}

impl GameStore for FileGameStore {
    fn save_snapshot(&self, snapshot: GameSnapshotEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.write(&snapshot).await.map_err(Into::into) })
    }

    fn load_snapshot(&self) -> BoxFuture<'static, StorageResult<Option<GameSnapshotEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.read().await.map_err(Into::into) })
    }

    fn clear_snapshot(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.remove().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check().await.map_err(Into::into) })
    }
}
