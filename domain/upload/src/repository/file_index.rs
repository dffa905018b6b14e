use async_trait::async_trait;

use crate::{
    exception::UploadResult,
    model::{
        entity::FileIndex,
        vo::{ContentHash, FileName},
    },
};

/// # Persisted file index
///
/// Every mutation is a read-modify-write of one shared document, implementations
/// must serialize them so that concurrent writers never lose an update.
#[async_trait]
pub trait FileIndexRepo: Send + Sync {
    /// Current index. An absent document is initialized empty and persisted.
    async fn load(&self) -> UploadResult<FileIndex>;

    async fn lookup(&self, hash: &ContentHash) -> UploadResult<Option<Vec<FileName>>>;

    /// Register `file_name` as an alias of `hash`, returns the aliases afterwards.
    async fn put_alias(&self, hash: &ContentHash, file_name: &FileName)
        -> UploadResult<Vec<FileName>>;

    /// Unregister `file_name`, see [`FileIndex::drop_alias`].
    async fn drop_alias(
        &self,
        hash: &ContentHash,
        file_name: &FileName,
    ) -> UploadResult<Option<Vec<FileName>>>;
}
