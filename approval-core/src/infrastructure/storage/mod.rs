pub mod local_fs;

pub use local_fs::LocalFsAttachmentStore;

use async_trait::async_trait;

use crate::shared::AppResult;

/// Blob storage seam for attachment content. The engine only ever sees the
/// opaque storage key it gets back.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Persist a blob for a request and return its storage key.
    async fn put(&self, request_id: i64, data: &[u8]) -> AppResult<String>;

    /// Read a blob back by its storage key.
    async fn read(&self, storage_key: &str) -> AppResult<Vec<u8>>;
}
