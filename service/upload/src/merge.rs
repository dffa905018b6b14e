use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use domain_upload::{
    command::MergeCommand,
    exception::{UploadException, UploadResult},
    model::vo::{ContentHash, MergeStep, MergedFile},
    repository::FileIndexRepo,
    service::{ChunkStageService, MergeService},
};
use tokio::io::AsyncWriteExt;
use typed_builder::TypedBuilder;

use crate::{HashLocks, StorageRoot};

/// Most missing indices an incomplete merge reports.
pub const MAX_REPORTED_MISSING: usize = 1024;

/// Merges staged chunks into an artifact under the storage root.
///
/// The artifact is assembled in a hidden temporary and renamed into place only when
/// every chunk has been appended. Chunks are removed after the index references the
/// artifact, so an interrupted merge can always be retried.
#[derive(TypedBuilder)]
pub struct MergeServiceImpl {
    index_repo: Arc<dyn FileIndexRepo>,
    stage: Arc<dyn ChunkStageService>,
    locks: Arc<HashLocks>,
    root: StorageRoot,
}

fn merge_failed(
    hash: &ContentHash,
    step: MergeStep,
) -> impl FnOnce(std::io::Error) -> UploadException {
    let hash = hash.to_string();
    move |source| UploadException::MergeFailed { hash, step, source }
}

impl MergeServiceImpl {
    async fn assemble(
        &self,
        hash: &ContentHash,
        expected_total: u64,
        temp: &Path,
        target: &Path,
    ) -> UploadResult<()> {
        let mut artifact = tokio::fs::File::create(temp)
            .await
            .map_err(merge_failed(hash, MergeStep::CreateArtifact))?;
        for index in 0..expected_total {
            let step = MergeStep::AppendChunk { index };
            let mut chunk =
                self.stage.open_chunk(hash, index).await.map_err(merge_failed(hash, step))?;
            tokio::io::copy(&mut chunk, &mut artifact)
                .await
                .map_err(merge_failed(hash, step))?;
        }
        let committed = async move {
            artifact.flush().await?;
            artifact.sync_all().await?;
            drop(artifact);
            tokio::fs::rename(temp, target).await
        }
        .await;
        committed.map_err(merge_failed(hash, MergeStep::CommitArtifact))
    }
}

#[async_trait]
impl MergeService for MergeServiceImpl {
    async fn merge(&self, cmd: MergeCommand) -> UploadResult<MergedFile> {
        let MergeCommand {
            hash,
            file_name,
            expected_total,
        } = cmd;
        let target = self.root.artifact_path(&file_name)?;
        let _guard = self.locks.lock(&hash).await;

        if self.index_repo.lookup(&hash).await?.is_some() {
            let names = self.index_repo.put_alias(&hash, &file_name).await?;
            self.stage
                .clear(&hash)
                .await
                .map_err(merge_failed(&hash, MergeStep::ClearStage))?;
            tracing::info!("Content {hash} is already stored, {file_name} aliased: {names:?}.");
            return Ok(MergedFile {
                hash,
                file_name,
                deduplicated: true,
            });
        }

        let staged = self.stage.list_chunks(&hash).await?;
        let actual = staged.len() as u64;
        // Distinct indices, so the right count ending at `total - 1` is exactly `0..total`.
        let complete = actual == expected_total
            && staged.last().map_or(true, |last| last + 1 == expected_total);
        if !complete {
            // Bounded by the staged count plus the cap, whatever total the client sent.
            let missing: Vec<u64> = (0..expected_total)
                .filter(|i| !staged.contains(i))
                .take(MAX_REPORTED_MISSING)
                .collect();
            return Err(UploadException::IncompleteUpload {
                hash: hash.to_string(),
                expected: expected_total,
                actual,
                missing,
            });
        }

        let temp = self.root.merge_temp_path(&hash);
        if let Err(e) = self.assemble(&hash, expected_total, &temp, &target).await {
            if let Err(remove_err) = tokio::fs::remove_file(&temp).await {
                tracing::debug!("Temporary {temp:?} not removed: {remove_err}");
            }
            return Err(e);
        }
        self.index_repo.put_alias(&hash, &file_name).await?;
        self.stage
            .clear(&hash)
            .await
            .map_err(merge_failed(&hash, MergeStep::ClearStage))?;
        tracing::info!("Merged {expected_total} chunks of {hash} into {file_name}.");
        Ok(MergedFile {
            hash,
            file_name,
            deduplicated: false,
        })
    }
}
