use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::command::StageChunkCommand;
use crate::exception::UploadResult;
use crate::model::vo::ContentHash;

/// # Chunk staging area
///
/// Holds the chunks of not yet merged files, one area per hash. Staged indices are
/// what makes an upload resumable. Implementations don't lock, callers serialize
/// operations on the same hash.
#[async_trait]
pub trait ChunkStageService: Send + Sync {
    async fn has_chunk(&self, hash: &ContentHash, index: u64) -> UploadResult<bool>;

    /// Whether a staging area exists for `hash`, even an empty one.
    async fn is_staged(&self, hash: &ContentHash) -> UploadResult<bool>;

    /// Move the chunk into place atomically, the source is left intact on failure.
    async fn write_chunk(&self, cmd: &StageChunkCommand) -> UploadResult<()>;

    /// Indices staged for `hash`, empty if nothing is staged.
    async fn list_chunks(&self, hash: &ContentHash) -> UploadResult<BTreeSet<u64>>;

    async fn open_chunk(&self, hash: &ContentHash, index: u64) -> std::io::Result<tokio::fs::File>;

    /// Remove the whole staging area, a missing one is fine.
    async fn clear(&self, hash: &ContentHash) -> std::io::Result<()>;
}
