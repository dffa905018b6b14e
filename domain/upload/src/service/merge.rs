use async_trait::async_trait;

use crate::command::MergeCommand;
use crate::exception::UploadResult;
use crate::model::vo::MergedFile;

/// # Merge engine
#[async_trait]
pub trait MergeService: Send + Sync {
    /// Assemble the staged chunks in index order and register the result.
    ///
    /// Fails with `IncompleteUpload` without touching anything if chunks are missing.
    /// Content that is already stored is only aliased, never written twice.
    async fn merge(&self, cmd: MergeCommand) -> UploadResult<MergedFile>;
}
