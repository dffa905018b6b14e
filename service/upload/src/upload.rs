use std::sync::Arc;

use async_trait::async_trait;
use domain_upload::{
    command::StageChunkCommand,
    exception::UploadResult,
    model::vo::{ContentHash, FileName, ProbeResult},
    repository::FileIndexRepo,
    service::{ChunkStageService, UploadService},
};
use typed_builder::TypedBuilder;

use crate::HashLocks;

#[derive(TypedBuilder)]
pub struct UploadServiceImpl {
    index_repo: Arc<dyn FileIndexRepo>,
    stage: Arc<dyn ChunkStageService>,
    locks: Arc<HashLocks>,
}

#[async_trait]
impl UploadService for UploadServiceImpl {
    async fn probe(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<ProbeResult> {
        let _guard = self.locks.lock(hash).await;
        let result = if self.index_repo.lookup(hash).await?.is_some() {
            ProbeResult::Stored
        } else if self.stage.is_staged(hash).await? {
            ProbeResult::Partial {
                staged_chunks: self.stage.list_chunks(hash).await?.into_iter().collect(),
            }
        } else {
            ProbeResult::Absent
        };
        tracing::debug!("Probed {file_name} with hash: {hash}: {result:?}");
        Ok(result)
    }

    async fn stage_chunk(&self, cmd: StageChunkCommand) -> UploadResult<u64> {
        let _guard = self.locks.lock(&cmd.hash).await;
        self.stage.write_chunk(&cmd).await?;
        tracing::debug!("Staged chunk {} of {}.", cmd.index, cmd.hash);
        Ok(cmd.index)
    }
}
