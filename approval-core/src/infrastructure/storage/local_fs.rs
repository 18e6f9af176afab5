//! Local filesystem attachment store. Blobs live under
//! `<root>/<request_id>/<uuid>`; keys are generated, never caller-supplied.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::infrastructure::storage::AttachmentStore;
use crate::shared::{AppError, AppResult};

/// How many generated keys to try before giving up on a collision streak.
const KEY_ATTEMPTS: usize = 5;

pub struct LocalFsAttachmentStore {
    root: PathBuf,
}

impl LocalFsAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, storage_key: &str) -> AppResult<PathBuf> {
        // Storage keys are engine-generated `<request_id>/<hex>` pairs;
        // anything with a path traversal component is rejected outright.
        let relative = Path::new(storage_key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AppError::Storage("invalid_storage_key".to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AttachmentStore for LocalFsAttachmentStore {
    async fn put(&self, request_id: i64, data: &[u8]) -> AppResult<String> {
        let dir = self.root.join(request_id.to_string());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("storage_error: {}", e)))?;

        for _ in 0..KEY_ATTEMPTS {
            let key = Uuid::new_v4().simple().to_string();
            let path = dir.join(&key);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(data)
                        .await
                        .map_err(|e| AppError::Storage(format!("storage_error: {}", e)))?;
                    file.flush()
                        .await
                        .map_err(|e| AppError::Storage(format!("storage_error: {}", e)))?;
                    return Ok(format!("{}/{}", request_id, key));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(AppError::Storage(format!("storage_error: {}", e))),
            }
        }
        Err(AppError::Storage("storage_error".to_string()))
    }

    async fn read(&self, storage_key: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(storage_key)?;
        fs::read(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AppError::not_found("not_found"),
                _ => AppError::Storage(format!("storage_error: {}", e)),
            })
    }
}
