use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::{AliasRemoval, ContentHash, FileName};

/// # Alias lifecycle
///
/// Content is stored once, however many names point at it. Removing a name never
/// removes content other names still need.
#[async_trait]
pub trait AliasService: Send + Sync {
    /// Register another name for already stored content.
    async fn link(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<Vec<FileName>>;

    async fn remove(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<AliasRemoval>;
}
