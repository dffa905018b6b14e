use std::path::PathBuf;

use crate::model::vo::{ContentHash, FileName};

/// Stage one received chunk.
#[derive(Debug, Clone)]
pub struct StageChunkCommand {
    pub hash: ContentHash,
    pub index: u64,
    /// Where the transport left the chunk's bytes.
    pub source: PathBuf,
}

/// Merge the staged chunks of `hash` into `file_name`.
#[derive(Debug, Clone)]
pub struct MergeCommand {
    pub hash: ContentHash,
    pub file_name: FileName,
    /// Number of chunks the client split the file into.
    pub expected_total: u64,
}
