use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::{Artifact, ContentHash, FileName, StoredFile};

#[async_trait]
pub trait ArtifactService: Send + Sync {
    /// Every stored alias.
    async fn list(&self) -> UploadResult<Vec<StoredFile>>;

    /// Open the artifact `file_name` of `hash` refers to.
    async fn fetch(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<Artifact>;
}
