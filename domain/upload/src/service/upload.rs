use async_trait::async_trait;

use crate::command::StageChunkCommand;
use crate::exception::UploadResult;
use crate::model::vo::{ContentHash, FileName, ProbeResult};

/// # Upload attempts
///
/// What a client talks to before merging: asking whether it has to upload at all,
/// and sending chunks.
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Whether `hash` is stored, partially staged or unknown. Has no side effects.
    async fn probe(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<ProbeResult>;

    /// Stage a chunk, returns its index.
    async fn stage_chunk(&self, cmd: StageChunkCommand) -> UploadResult<u64>;
}
