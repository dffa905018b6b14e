use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use domain_upload::{
    command::StageChunkCommand,
    exception::{UploadException, UploadResult},
    model::vo::ContentHash,
    service::ChunkStageService,
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Chunks staged as `<base>/<hash>/<index>`.
#[derive(TypedBuilder, Clone)]
pub struct LocalChunkStageServiceImpl {
    #[builder(default = "uploads".into(), setter(into))]
    base: PathBuf,
}

impl LocalChunkStageServiceImpl {
    fn stage_dir(&self, hash: &ContentHash) -> PathBuf {
        self.base.join(hash.as_str())
    }

    fn chunk_path(&self, hash: &ContentHash, index: u64) -> PathBuf {
        self.stage_dir(hash).join(index.to_string())
    }

    /// Copy `source` next to `target` then rename it into place.
    async fn copy_into_place(source: &Path, target: &Path, temp: &Path) -> std::io::Result<()> {
        let copied = async {
            tokio::fs::copy(source, temp).await?;
            tokio::fs::File::open(temp).await?.sync_all().await?;
            tokio::fs::rename(temp, target).await
        }
        .await;
        if copied.is_err() {
            let _ = tokio::fs::remove_file(temp).await;
        }
        copied
    }
}

/// Parse a staged entry name back to its index, temporaries and foreign files yield `None`.
fn parse_index(name: &str) -> Option<u64> {
    let index = name.parse::<u64>().ok()?;
    (index.to_string() == name).then_some(index)
}

#[async_trait]
impl ChunkStageService for LocalChunkStageServiceImpl {
    async fn has_chunk(&self, hash: &ContentHash, index: u64) -> UploadResult<bool> {
        let path = self.chunk_path(hash, index);
        Ok(tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("can't stat chunk {path:?}"))?)
    }

    async fn is_staged(&self, hash: &ContentHash) -> UploadResult<bool> {
        match tokio::fs::metadata(self.stage_dir(hash)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_chunk(&self, cmd: &StageChunkCommand) -> UploadResult<()> {
        let StageChunkCommand {
            hash,
            index,
            source,
        } = cmd;
        let failed = |source| UploadException::ChunkWrite {
            hash: hash.to_string(),
            index: *index,
            source,
        };
        let dir = self.stage_dir(hash);
        tokio::fs::create_dir_all(&dir).await.map_err(failed)?;
        let target = self.chunk_path(hash, *index);

        match tokio::fs::rename(source, &target).await {
            Ok(()) => return Ok(()),
            Err(e) => tracing::debug!("Can't rename {source:?} to {target:?}, copying it: {e}"),
        }
        let temp = dir.join(format!(".{index}.{}.part", Uuid::new_v4()));
        if let Err(e) = Self::copy_into_place(source, &target, &temp).await {
            // Only succeeds when nothing else is staged.
            let _ = tokio::fs::remove_dir(&dir).await;
            return Err(failed(e));
        }
        if let Err(e) = tokio::fs::remove_file(source).await {
            tracing::warn!("Chunk {index} of {hash} is staged but {source:?} can't be removed: {e}");
        }
        Ok(())
    }

    async fn list_chunks(&self, hash: &ContentHash) -> UploadResult<BTreeSet<u64>> {
        let dir = self.stage_dir(hash);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(e.into()),
        };
        let mut indices = BTreeSet::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(index) = entry.file_name().to_str().and_then(parse_index) {
                indices.insert(index);
            }
        }
        Ok(indices)
    }

    async fn open_chunk(&self, hash: &ContentHash, index: u64) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(self.chunk_path(hash, index)).await
    }

    async fn clear(&self, hash: &ContentHash) -> std::io::Result<()> {
        match tokio::fs::remove_dir_all(self.stage_dir(hash)).await {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
